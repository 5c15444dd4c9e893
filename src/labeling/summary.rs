//! Training-corpus progress rollup.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::predictables::ModelType;

use super::counter::LabelsCounter;

/// Completed / pending label counts of one kind, per orientation and combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcInfo {
    pub completed_survivor: usize,
    pub pending_survivor: usize,
    pub completed_killer: usize,
    pub pending_killer: usize,
    pub total_survivor: usize,
    pub total_killer: usize,
    pub total_completed: usize,
    pub total_pending: usize,
}

impl TcInfo {
    pub fn from_counters(survivor: &LabelsCounter, killer: &LabelsCounter) -> Self {
        Self {
            completed_survivor: survivor.completed,
            pending_survivor: survivor.pending,
            completed_killer: killer.completed,
            pending_killer: killer.pending,
            total_survivor: survivor.total,
            total_killer: killer.total,
            total_completed: survivor.completed + killer.completed,
            total_pending: survivor.pending + killer.pending,
        }
    }

    pub fn total(&self) -> usize {
        self.total_completed + self.total_pending
    }
}

fn progress(completed: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    let percent = completed as f64 * 100.0 / total as f64;
    format!("{completed}/{total} ({percent:.1}%)")
}

/// Markdown table with one line per kind.
pub fn render_markdown(info: &BTreeMap<ModelType, TcInfo>) -> String {
    let mut out = String::from("| kind | survivor | killer | total |\n|---|---|---|---|\n");
    for (model_type, tc) in info {
        let _ = writeln!(
            out,
            "| {model_type} | {} | {} | {} |",
            progress(tc.completed_survivor, tc.total_survivor),
            progress(tc.completed_killer, tc.total_killer),
            progress(tc.total_completed, tc.total()),
        );
    }
    out
}
