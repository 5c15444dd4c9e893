//! Remote labels API: where tables and catalogs come from and where corrections go.
//!
//! The labeling core only sees the [`DataSource`] and [`Uploader`] traits; [`ApiClient`]
//! implements both over HTTP.

mod client;
mod wire;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogEntry, Catalogs, TypeEntry};
use crate::predictables::{FullModelType, LabelId, MatchId, ModelType, PlayerId};
use crate::tables::{Dataset, LabelRow, LabelTable, MatchRecord, MatchTable};

pub use client::{ApiClient, ApiLimits};

/// Errors raised while talking to the labels API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status; `message` is its body, verbatim.
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
    #[error("Invalid API host {host}: {message}")]
    InvalidHost { host: String, message: String },
    #[error("Label row for match {match_id} has invalid player id {player_id}")]
    InvalidPlayer { match_id: MatchId, player_id: i64 },
}

/// Corrected values for one player of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LabelValues {
    Single(LabelId),
    Many(Vec<LabelId>),
}

impl LabelValues {
    /// One-column kinds upload a bare id, the others a list.
    pub fn from_slice(values: &[LabelId]) -> Self {
        match values {
            [single] => Self::Single(*single),
            many => Self::Many(many.to_vec()),
        }
    }
}

/// Loads the tables and catalogs a labeling run starts from.
pub trait DataSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>, ApiError>;
    fn load_labels(&self) -> Result<Vec<LabelRow>, ApiError>;
    fn load_catalog(&self, fmt: FullModelType) -> Result<Vec<CatalogEntry>, ApiError>;
    fn load_type_catalog(&self, model_type: ModelType) -> Result<Vec<TypeEntry>, ApiError>;
    fn load_rarities(&self) -> Result<Vec<TypeEntry>, ApiError>;
}

/// Pushes one player's corrected cells for one kind.
pub trait Uploader {
    fn submit(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        fmt: FullModelType,
        values: &LabelValues,
    ) -> Result<(), ApiError>;
}

/// Load matches and labels into a [`Dataset`].
pub fn load_dataset(source: &dyn DataSource) -> Result<Dataset, ApiError> {
    let matches = MatchTable::new(source.load_matches()?);
    let labels = LabelTable::new(source.load_labels()?);
    tracing::info!(
        matches = matches.len(),
        labels = labels.len(),
        "Loaded labeling tables"
    );
    Ok(Dataset::new(matches, labels))
}

/// Load every predictable catalog, the type catalogs of typed kinds and the rarities.
pub fn load_catalogs(source: &dyn DataSource) -> Result<Catalogs, ApiError> {
    let mut catalogs = Catalogs::new();
    for fmt in FullModelType::all() {
        catalogs.insert_predictables(fmt, source.load_catalog(fmt)?);
    }
    for model_type in ModelType::ALL.into_iter().filter(|mt| mt.has_types()) {
        catalogs.insert_types(model_type, source.load_type_catalog(model_type)?);
    }
    catalogs.set_rarities(source.load_rarities()?);
    tracing::info!("Loaded predictable catalogs");
    Ok(catalogs)
}
