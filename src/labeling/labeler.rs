//! One labeling session for a single kind/orientation pair.

use std::path::PathBuf;

use crate::crops::CropResolver;
use crate::predictables::{FullModelType, LabelId, MatchId, PlayerId, TOTAL_CELLS};
use crate::tables::{Dataset, RowIndex};

use super::LabelerError;
use super::counter::LabelsCounter;
use super::page::{CurrentPage, derive_page};
use super::pending::PendingSet;

/// Walks the pending rows of one kind in pages of [`TOTAL_CELLS`] cells.
///
/// The labeler only holds cursor state; the tables live in a [`Dataset`] passed to each call so
/// that every session works on the same rows.
#[derive(Debug, Clone)]
pub struct Labeler {
    fmt: FullModelType,
    pending: PendingSet,
    counts: LabelsCounter,
    current: CurrentPage,
}

impl Labeler {
    pub fn new(data: &Dataset, fmt: FullModelType) -> Result<Self, LabelerError> {
        let (n_players, n_items) = page_dims(fmt)?;
        let pending = PendingSet::compute(&data.labels, fmt);

        let total_labels = pending.total_rows * n_items;
        let pending_labels = pending.len() * n_items;
        let counts = LabelsCounter::new(
            total_labels - pending_labels,
            pending_labels,
            n_players,
            n_items,
        )?;
        let current = if counts.done() {
            CurrentPage::empty()
        } else {
            CurrentPage::placeholder(counts.total_cells(), n_items, fmt.null_id())
        };
        tracing::debug!(
            %fmt,
            pending_rows = pending.len(),
            total_rows = pending.total_rows,
            "labeler created"
        );
        Ok(Self {
            fmt,
            pending,
            counts,
            current,
        })
    }

    pub fn fmt(&self) -> FullModelType {
        self.fmt
    }

    pub fn counts(&self) -> &LabelsCounter {
        &self.counts
    }

    pub fn current(&self) -> &CurrentPage {
        &self.current
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    pub fn n_players(&self) -> usize {
        self.counts.n_players()
    }

    pub fn n_items(&self) -> usize {
        self.counts.n_items()
    }

    pub fn total_cells(&self) -> usize {
        self.counts.total_cells()
    }

    pub fn done(&self) -> bool {
        self.counts.done()
    }

    pub fn null_id(&self) -> LabelId {
        self.fmt.null_id()
    }

    /// Label ids of the page in view.
    pub fn labels(&self) -> Vec<LabelId> {
        self.current.labels()
    }

    /// Move one page forward (or back) and return the new page's labels.
    ///
    /// Going forward past the last pending row is a no-op; going back from the first page is
    /// an [`LabelerError::OutOfBounds`] error.
    pub fn next(&mut self, data: &Dataset, go_back: bool) -> Result<Vec<LabelId>, LabelerError> {
        let ptr_min = self.counts.ptr_min();
        if !go_back && ptr_min >= self.pending.len() as isize {
            return Ok(self.labels());
        }
        if go_back && ptr_min <= 0 {
            return Err(LabelerError::OutOfBounds { fmt: self.fmt });
        }

        let mut counts = self.counts.clone();
        counts.advance(go_back);
        let current = if counts.done() {
            CurrentPage::empty()
        } else {
            let rows = window_rows(self.fmt, &self.pending, &counts)?;
            derive_page(&data.matches, &data.labels, self.fmt, rows)?
        };
        self.counts = counts;
        self.current = current;

        tracing::debug!(
            fmt = %self.fmt,
            go_back,
            ptr_min = self.counts.ptr_min(),
            ptr_max = self.counts.ptr_max(),
            completed = self.counts.completed,
            pending = self.counts.pending,
            done = self.done(),
            "labeler moved"
        );
        Ok(self.labels())
    }

    pub fn previous(&mut self, data: &Dataset) -> Result<Vec<LabelId>, LabelerError> {
        self.next(data, true)
    }

    /// Label-table rows behind the page in view.
    pub fn current_rows(&self) -> Result<&[RowIndex], LabelerError> {
        if self.done() {
            return Err(LabelerError::NothingInView { fmt: self.fmt });
        }
        window_rows(self.fmt, &self.pending, &self.counts)
    }

    /// Write `new_labels` (player-major) into the kind's columns of the rows in view, then
    /// rebuild the page from what was stored.
    pub fn update_current(
        &mut self,
        data: &mut Dataset,
        new_labels: &[LabelId],
    ) -> Result<(), LabelerError> {
        if new_labels.len() != self.total_cells() {
            return Err(LabelerError::WrongLabelCount {
                expected: self.total_cells(),
                got: new_labels.len(),
            });
        }
        let rows = self.current_rows()?.to_vec();
        let model_type = self.fmt.model_type();
        for (&ix, values) in rows.iter().zip(new_labels.chunks(self.n_items())) {
            let row = data
                .labels
                .row_mut(ix)
                .ok_or(LabelerError::UnknownRow(ix))?;
            for (cell, value) in row.cells_mut(model_type).iter_mut().zip(values) {
                *cell = Some(*value);
            }
        }
        self.current = derive_page(&data.matches, &data.labels, self.fmt, &rows)?;
        Ok(())
    }

    /// Flag the rows in view as manually checked for this kind. Returns how many rows changed.
    pub fn mark_current_checked(&self, data: &mut Dataset) -> Result<usize, LabelerError> {
        let rows = self.current_rows()?;
        let model_type = self.fmt.model_type();
        Ok(rows
            .iter()
            .filter(|&&ix| data.labels.mark_checked(ix, model_type))
            .count())
    }

    /// Primary key of the `player_index`-th player (0-based) of the page in view.
    pub fn get_key(&self, player_index: usize) -> Result<(MatchId, PlayerId), LabelerError> {
        if player_index >= self.n_players() {
            return Err(LabelerError::PlayerOutOfRange {
                index: player_index,
                n_players: self.n_players(),
            });
        }
        let cell = self
            .current
            .cells()
            .get(player_index * self.n_items())
            .ok_or(LabelerError::NothingInView { fmt: self.fmt })?;
        match (cell.match_id, cell.player_id) {
            (Some(match_id), Some(player_id)) => Ok((match_id, player_id)),
            _ => Err(LabelerError::NothingInView { fmt: self.fmt }),
        }
    }

    /// Split a flat page-ordered list into one chunk per player.
    pub fn wrap<'a>(&self, values: &'a [LabelId]) -> Vec<&'a [LabelId]> {
        values.chunks(self.n_items()).collect()
    }

    /// Values of another kind for the same players as the page in view, one per cell.
    ///
    /// The other kind's first column is used. Cells without a bound player, or whose player
    /// belongs to the other orientation, read as that kind's null id.
    pub fn filter_fmt_with_current(
        &self,
        data: &Dataset,
        other: FullModelType,
    ) -> Result<Vec<LabelId>, LabelerError> {
        if other == self.fmt {
            return Err(LabelerError::SameKind(other));
        }
        let null_id = other.null_id();
        Ok(self
            .current
            .cells()
            .iter()
            .map(|cell| {
                let (Some(match_id), Some(player_id)) = (cell.match_id, cell.player_id) else {
                    return null_id;
                };
                if !other.orientation().covers(player_id) {
                    return null_id;
                }
                data.labels
                    .find(match_id, player_id)
                    .and_then(|row| row.cells(other.model_type()).first().copied().flatten())
                    .unwrap_or(null_id)
            })
            .collect())
    }

    /// Crop image paths for every cell of the page in view.
    pub fn crop_paths(&self, resolver: &CropResolver) -> Vec<PathBuf> {
        self.current
            .cells()
            .iter()
            .filter(|cell| cell.match_id.is_some())
            .filter_map(|cell| {
                let player_id = cell.player_id?;
                Some(resolver.crop_path(self.fmt, &cell.filename, player_id, cell.item_index))
            })
            .collect()
    }
}

fn page_dims(fmt: FullModelType) -> Result<(usize, usize), LabelerError> {
    let n_items = fmt.n_items();
    if n_items == 0 || TOTAL_CELLS % n_items != 0 {
        return Err(LabelerError::CellsNotDivisible {
            fmt,
            total_cells: TOTAL_CELLS,
            n_items,
        });
    }
    Ok((TOTAL_CELLS / n_items, n_items))
}

fn window_rows<'a>(
    fmt: FullModelType,
    pending: &'a PendingSet,
    counts: &LabelsCounter,
) -> Result<&'a [RowIndex], LabelerError> {
    let range = counts
        .window()
        .ok_or(LabelerError::NothingInView { fmt })?;
    pending
        .positions
        .get(range.clone())
        .ok_or(LabelerError::WindowOutOfRange {
            start: range.start,
            end: range.end,
            len: pending.len(),
        })
}
