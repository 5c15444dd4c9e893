//! Paginated labeling sessions over the pending-label queue.
//!
//! A [`Labeler`] walks the unchecked rows of one kind/orientation in fixed strides, a
//! [`LabelerSelector`] owns every session and the option lists of the active one, and
//! [`submit`](submit::submit_page) ties uploads to local commits.

pub mod counter;
pub mod labeler;
pub mod page;
pub mod pending;
pub mod selector;
pub mod submit;
pub mod summary;

use thiserror::Error;

use crate::predictables::{FullModelType, MatchId, PredictableError};
use crate::tables::RowIndex;

pub use counter::LabelsCounter;
pub use labeler::Labeler;
pub use page::{CurrentPage, PageCell};
pub use pending::PendingSet;
pub use selector::LabelerSelector;
pub use submit::{SubmitError, submit_page};
pub use summary::TcInfo;

/// Errors raised by labeling sessions.
///
/// Configuration variants are fatal for the session that raised them; bounds and view variants
/// describe a request the caller can correct.
#[derive(Debug, Error)]
pub enum LabelerError {
    #[error("Total cells ({total_cells}) must be a multiple of {fmt}'s {n_items} items")]
    CellsNotDivisible {
        fmt: FullModelType,
        total_cells: usize,
        n_items: usize,
    },
    #[error("Counter needs at least one player and one item (got {n_players}x{n_items})")]
    InvalidDimensions { n_players: usize, n_items: usize },
    #[error("No labeler registered for {0}")]
    UnknownLabeler(FullModelType),
    #[error(transparent)]
    Predictable(#[from] PredictableError),
    #[error("Labeler pointer out of bounds for {fmt}")]
    OutOfBounds { fmt: FullModelType },
    #[error("No page in view for {fmt}")]
    NothingInView { fmt: FullModelType },
    #[error("Pending window {start}..{end} exceeds {len} pending rows")]
    WindowOutOfRange { start: usize, end: usize, len: usize },
    #[error("Expected {expected} labels, got {got}")]
    WrongLabelCount { expected: usize, got: usize },
    #[error("Player index {index} out of range (page has {n_players} players)")]
    PlayerOutOfRange { index: usize, n_players: usize },
    #[error("Cannot filter {0} with its own page")]
    SameKind(FullModelType),
    #[error("Match {0} not found")]
    UnknownMatch(MatchId),
    #[error("Label row {0} not found")]
    UnknownRow(RowIndex),
}

impl LabelerError {
    /// True for errors that indicate a broken setup rather than a bad request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::CellsNotDivisible { .. }
                | Self::InvalidDimensions { .. }
                | Self::UnknownLabeler(_)
                | Self::Predictable(_)
        )
    }
}
