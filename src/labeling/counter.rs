//! Cursor over the pending rows and the completed/pending label counts it drives.

use super::LabelerError;

/// Labeling progress of one session. `total` is always `completed + pending`.
///
/// Counts are in labels (cells), pointers are in pending rows. The cursor starts one stride
/// before the first page so the first forward step lands on row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelsCounter {
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
    n_players: usize,
    n_items: usize,
    ptr_min: isize,
    ptr_max: isize,
    ptr_min_reach: isize,
    total_cells: usize,
}

impl LabelsCounter {
    pub fn new(
        completed: usize,
        pending: usize,
        n_players: usize,
        n_items: usize,
    ) -> Result<Self, LabelerError> {
        if n_players == 0 || n_items == 0 {
            return Err(LabelerError::InvalidDimensions { n_players, n_items });
        }
        let stride = n_players as isize;
        Ok(Self {
            completed,
            pending,
            total: completed + pending,
            n_players,
            n_items,
            ptr_min: -stride,
            ptr_max: 0,
            ptr_min_reach: -stride,
            total_cells: n_players * n_items,
        })
    }

    /// All-zero counter standing in for a kind/orientation without a session.
    pub fn placeholder() -> Self {
        Self {
            completed: 0,
            pending: 0,
            total: 0,
            n_players: 0,
            n_items: 0,
            ptr_min: 0,
            ptr_max: 0,
            ptr_min_reach: 0,
            total_cells: 0,
        }
    }

    /// Less than a full page is left. Partial final pages are never shown.
    pub fn done(&self) -> bool {
        self.pending < self.total_cells
    }

    pub fn n_players(&self) -> usize {
        self.n_players
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    pub fn ptr_min(&self) -> isize {
        self.ptr_min
    }

    pub fn ptr_max(&self) -> isize {
        self.ptr_max
    }

    pub fn ptr_min_reach(&self) -> isize {
        self.ptr_min_reach
    }

    /// Pending-row window `[ptr_min, ptr_max)`, or `None` before the first page.
    pub fn window(&self) -> Option<std::ops::Range<usize>> {
        if self.ptr_min < 0 {
            return None;
        }
        Some(self.ptr_min as usize..self.ptr_max as usize)
    }

    /// Move the window one stride. Counts only change the first time new ground is reached
    /// going forward, so revisiting pages never counts them twice.
    pub fn advance(&mut self, go_back: bool) {
        let stride = self.n_players as isize;
        let row_step = if go_back { -stride } else { stride };
        let label_step = self.n_players * self.n_items;

        self.ptr_min += row_step;
        self.ptr_max += row_step;

        if go_back || self.ptr_min <= self.ptr_min_reach {
            return;
        }
        self.ptr_min_reach = self.ptr_min;
        // The step onto the first page covers nothing yet.
        if self.ptr_min_reach > 0 {
            self.completed = (self.completed + label_step).min(self.total);
            self.pending = self.total - self.completed;
        }
    }
}
