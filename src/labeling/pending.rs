//! Rows still waiting for a manual check.

use crate::predictables::FullModelType;
use crate::tables::{LabelTable, RowIndex};

/// Unchecked rows of one kind/orientation plus the fixed row total used for progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    /// Label-table positions of rows not yet manually checked, in table order.
    pub positions: Vec<RowIndex>,
    /// Rows matching the orientation, checked or not.
    pub total_rows: usize,
}

impl PendingSet {
    /// Collect pending rows for `fmt`.
    ///
    /// The result is a snapshot: submitting labels later does not shrink it, the labeler's
    /// cursor simply moves past the rows it already showed.
    pub fn compute(labels: &LabelTable, fmt: FullModelType) -> Self {
        let model_type = fmt.model_type();
        let orientation = fmt.orientation();
        let mut total_rows = 0usize;
        let mut positions = Vec::new();
        for (ix, row) in labels.rows().iter().enumerate() {
            if !orientation.covers(row.player_id) {
                continue;
            }
            total_rows += 1;
            if !row.manually_checked.get(model_type) {
                positions.push(ix);
            }
        }
        Self {
            positions,
            total_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
