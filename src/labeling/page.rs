//! Materialized view of the page currently in front of the annotator.

use crate::predictables::{FullModelType, LabelId, MatchId, PlayerId};
use crate::tables::{LabelTable, MatchTable, RowIndex};

use super::LabelerError;

/// One label cell of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCell {
    /// `None` on placeholder cells shown before the first page.
    pub match_id: Option<MatchId>,
    pub filename: String,
    pub match_date: Option<String>,
    pub dbd_version: Option<String>,
    pub label_id: LabelId,
    pub player_id: Option<PlayerId>,
    /// Column of the kind this cell shows (0 for single-column kinds).
    pub item_index: usize,
}

/// Cells ordered player-major, item-minor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPage {
    cells: Vec<PageCell>,
}

impl CurrentPage {
    /// Page shown before any navigation: null labels, no match bound.
    pub fn placeholder(total_cells: usize, n_items: usize, null_id: LabelId) -> Self {
        let cells = (0..total_cells)
            .map(|i| PageCell {
                match_id: None,
                filename: String::new(),
                match_date: None,
                dbd_version: None,
                label_id: null_id,
                player_id: None,
                item_index: i % n_items,
            })
            .collect();
        Self { cells }
    }

    /// Page shown once a session is done.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[PageCell] {
        &self.cells
    }

    pub fn labels(&self) -> Vec<LabelId> {
        self.cells.iter().map(|cell| cell.label_id).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Build the page for `rows` from the current table contents.
///
/// Missing label values show as the kind's null id. Every row's match must exist in `matches`.
pub fn derive_page(
    matches: &MatchTable,
    labels: &LabelTable,
    fmt: FullModelType,
    rows: &[RowIndex],
) -> Result<CurrentPage, LabelerError> {
    let model_type = fmt.model_type();
    let null_id = fmt.null_id();
    let mut cells = Vec::with_capacity(rows.len() * fmt.n_items());
    for &ix in rows {
        let row = labels.row(ix).ok_or(LabelerError::UnknownRow(ix))?;
        let record = matches
            .get(row.match_id)
            .ok_or(LabelerError::UnknownMatch(row.match_id))?;
        for (item_index, value) in row.cells(model_type).iter().enumerate() {
            cells.push(PageCell {
                match_id: Some(record.id),
                filename: record.filename.clone(),
                match_date: record.match_date.clone(),
                dbd_version: record.dbd_version.clone(),
                label_id: value.unwrap_or(null_id),
                player_id: Some(row.player_id),
                item_index,
            });
        }
    }
    Ok(CurrentPage { cells })
}
