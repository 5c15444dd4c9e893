//! In-memory match and label tables shared by every labeling session.

use std::collections::{BTreeMap, HashMap};

use crate::predictables::{LabelId, MatchId, ModelType, PlayerId};

/// Position of a row inside the [`LabelTable`] arena.
pub type RowIndex = usize;

/// Match metadata needed to present a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: MatchId,
    pub filename: String,
    pub match_date: Option<String>,
    pub dbd_version: Option<String>,
}

/// Matches keyed by id. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    matches: BTreeMap<MatchId, MatchRecord>,
}

impl MatchTable {
    pub fn new(records: impl IntoIterator<Item = MatchRecord>) -> Self {
        Self {
            matches: records.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn get(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.get(&id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Per-kind "manually checked" flags of a label row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualChecks {
    pub addons: bool,
    pub character: bool,
    pub item: bool,
    pub offering: bool,
    pub perks: bool,
    pub status: bool,
}

impl ManualChecks {
    pub fn get(&self, model_type: ModelType) -> bool {
        match model_type {
            ModelType::Addons => self.addons,
            ModelType::Character => self.character,
            ModelType::Item => self.item,
            ModelType::Offering => self.offering,
            ModelType::Perks => self.perks,
            ModelType::Status => self.status,
        }
    }

    pub fn set(&mut self, model_type: ModelType, value: bool) {
        let flag = match model_type {
            ModelType::Addons => &mut self.addons,
            ModelType::Character => &mut self.character,
            ModelType::Item => &mut self.item,
            ModelType::Offering => &mut self.offering,
            ModelType::Perks => &mut self.perks,
            ModelType::Status => &mut self.status,
        };
        *flag = value;
    }
}

/// Labels recorded for one player of one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRow {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub character: Option<LabelId>,
    pub perks: [Option<LabelId>; 4],
    pub item: Option<LabelId>,
    pub addons: [Option<LabelId>; 2],
    pub offering: Option<LabelId>,
    pub status: Option<LabelId>,
    pub manually_checked: ManualChecks,
}

impl LabelRow {
    pub fn new(match_id: MatchId, player_id: PlayerId) -> Self {
        Self {
            match_id,
            player_id,
            ..Self::default()
        }
    }

    /// The kind's label cells, in column order.
    pub fn cells(&self, model_type: ModelType) -> &[Option<LabelId>] {
        match model_type {
            ModelType::Addons => &self.addons,
            ModelType::Character => std::slice::from_ref(&self.character),
            ModelType::Item => std::slice::from_ref(&self.item),
            ModelType::Offering => std::slice::from_ref(&self.offering),
            ModelType::Perks => &self.perks,
            ModelType::Status => std::slice::from_ref(&self.status),
        }
    }

    pub fn cells_mut(&mut self, model_type: ModelType) -> &mut [Option<LabelId>] {
        match model_type {
            ModelType::Addons => &mut self.addons,
            ModelType::Character => std::slice::from_mut(&mut self.character),
            ModelType::Item => std::slice::from_mut(&mut self.item),
            ModelType::Offering => std::slice::from_mut(&mut self.offering),
            ModelType::Perks => &mut self.perks,
            ModelType::Status => std::slice::from_mut(&mut self.status),
        }
    }

    pub fn key(&self) -> (MatchId, PlayerId) {
        (self.match_id, self.player_id)
    }
}

/// Label rows ordered by `(match_id, player_id)`, addressable by position or by key.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    rows: Vec<LabelRow>,
    index: HashMap<(MatchId, PlayerId), RowIndex>,
}

impl LabelTable {
    /// Build the table, sorting rows by key. A later row with a duplicate key replaces the earlier one.
    pub fn new(rows: impl IntoIterator<Item = LabelRow>) -> Self {
        let mut by_key: BTreeMap<(MatchId, PlayerId), LabelRow> = BTreeMap::new();
        for row in rows {
            by_key.insert(row.key(), row);
        }
        let rows: Vec<LabelRow> = by_key.into_values().collect();
        let index = rows
            .iter()
            .enumerate()
            .map(|(ix, row)| (row.key(), ix))
            .collect();
        Self { rows, index }
    }

    pub fn rows(&self) -> &[LabelRow] {
        &self.rows
    }

    pub fn row(&self, ix: RowIndex) -> Option<&LabelRow> {
        self.rows.get(ix)
    }

    pub fn row_mut(&mut self, ix: RowIndex) -> Option<&mut LabelRow> {
        self.rows.get_mut(ix)
    }

    pub fn position(&self, match_id: MatchId, player_id: PlayerId) -> Option<RowIndex> {
        self.index.get(&(match_id, player_id)).copied()
    }

    pub fn find(&self, match_id: MatchId, player_id: PlayerId) -> Option<&LabelRow> {
        self.position(match_id, player_id).and_then(|ix| self.row(ix))
    }

    pub fn mark_checked(&mut self, ix: RowIndex, model_type: ModelType) -> bool {
        match self.rows.get_mut(ix) {
            Some(row) => {
                row.manually_checked.set(model_type, true);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Both tables of a labeling run. Every session reads the same data, filtered differently.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub matches: MatchTable,
    pub labels: LabelTable,
}

impl Dataset {
    pub fn new(matches: MatchTable, labels: LabelTable) -> Self {
        Self { matches, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table_sorts_rows_and_indexes_keys() {
        let table = LabelTable::new([
            LabelRow::new(2, 0),
            LabelRow::new(1, 4),
            LabelRow::new(1, 0),
        ]);
        let keys: Vec<_> = table.rows().iter().map(LabelRow::key).collect();
        assert_eq!(keys, vec![(1, 0), (1, 4), (2, 0)]);
        assert_eq!(table.position(1, 4), Some(1));
        assert_eq!(table.position(3, 0), None);
    }

    #[test]
    fn cells_expose_kind_columns() {
        let mut row = LabelRow::new(1, 0);
        row.cells_mut(ModelType::Perks)[2] = Some(42);
        row.cells_mut(ModelType::Item)[0] = Some(7);
        assert_eq!(row.perks, [None, None, Some(42), None]);
        assert_eq!(row.cells(ModelType::Item), &[Some(7)]);
        assert_eq!(row.cells(ModelType::Addons).len(), 2);
    }

    #[test]
    fn mark_checked_only_touches_requested_kind() {
        let mut table = LabelTable::new([LabelRow::new(1, 0)]);
        assert!(table.mark_checked(0, ModelType::Perks));
        assert!(!table.mark_checked(5, ModelType::Perks));
        let checks = table.row(0).unwrap().manually_checked;
        assert!(checks.get(ModelType::Perks));
        assert!(!checks.get(ModelType::Item));
    }
}
