use std::cell::RefCell;
use std::collections::HashMap;

use dbdie_labeler::api::{ApiError, DataSource, LabelValues, Uploader};
use dbdie_labeler::catalog::{CatalogEntry, TypeEntry};
use dbdie_labeler::predictables::{FullModelType, LabelId, MatchId, ModelType, PlayerId};
use dbdie_labeler::tables::{Dataset, LabelRow, LabelTable, MatchRecord, MatchTable};

pub fn fmt(value: &str) -> FullModelType {
    value.parse().unwrap()
}

pub fn match_records(n_matches: i64) -> Vec<MatchRecord> {
    (0..n_matches)
        .map(|id| MatchRecord {
            id,
            filename: format!("match_{id:03}.png"),
            match_date: Some("2024-06-01".into()),
            dbd_version: Some("8.0.0".into()),
        })
        .collect()
}

/// Five players per match with distinct, predictable label values.
pub fn label_rows(n_matches: i64) -> Vec<LabelRow> {
    (0..n_matches)
        .flat_map(|match_id| {
            (0..=4u8).map(move |player_id| {
                let base = match_id * 100 + i64::from(player_id) * 10;
                let mut row = LabelRow::new(match_id, player_id);
                row.character = Some(base + 1);
                row.perks = [Some(base + 2), Some(base + 3), Some(base + 4), Some(base + 5)];
                row.item = Some(base + 6);
                row.addons = [Some(base + 7), Some(base + 8)];
                row.offering = Some(base + 9);
                if player_id != 4 {
                    row.status = Some(base);
                }
                row
            })
        })
        .collect()
}

pub fn dataset(n_matches: i64) -> Dataset {
    Dataset::new(
        MatchTable::new(match_records(n_matches)),
        LabelTable::new(label_rows(n_matches)),
    )
}

pub fn typed(id: LabelId, name: &str, type_id: i64) -> CatalogEntry {
    CatalogEntry {
        type_id: Some(type_id),
        ..CatalogEntry::new(id, name)
    }
}

pub fn killer_addon(id: LabelId, name: &str, item_id: i64, rarity_id: i64) -> CatalogEntry {
    CatalogEntry {
        item_id: Some(item_id),
        rarity_id: Some(rarity_id),
        type_id: Some(1),
        ..CatalogEntry::new(id, name)
    }
}

/// In-memory tables and catalogs served through [`DataSource`].
#[derive(Default)]
pub struct FakeSource {
    pub matches: Vec<MatchRecord>,
    pub labels: Vec<LabelRow>,
    pub catalogs: HashMap<FullModelType, Vec<CatalogEntry>>,
    pub types: HashMap<ModelType, Vec<TypeEntry>>,
    pub rarities: Vec<TypeEntry>,
    pub fail_labels: bool,
}

impl FakeSource {
    pub fn with_rows(matches: Vec<MatchRecord>, labels: Vec<LabelRow>) -> Self {
        Self {
            matches,
            labels,
            ..Self::default()
        }
    }
}

impl DataSource for FakeSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>, ApiError> {
        Ok(self.matches.clone())
    }

    fn load_labels(&self) -> Result<Vec<LabelRow>, ApiError> {
        if self.fail_labels {
            return Err(ApiError::Status {
                code: 503,
                message: "labels table is being rebuilt".into(),
            });
        }
        Ok(self.labels.clone())
    }

    fn load_catalog(&self, fmt: FullModelType) -> Result<Vec<CatalogEntry>, ApiError> {
        Ok(self.catalogs.get(&fmt).cloned().unwrap_or_default())
    }

    fn load_type_catalog(&self, model_type: ModelType) -> Result<Vec<TypeEntry>, ApiError> {
        Ok(self.types.get(&model_type).cloned().unwrap_or_default())
    }

    fn load_rarities(&self) -> Result<Vec<TypeEntry>, ApiError> {
        Ok(self.rarities.clone())
    }
}

/// Records uploads; fails the `fail_at`-th call (0-based) with a remote message.
#[derive(Default)]
pub struct FakeUploader {
    pub calls: RefCell<Vec<(MatchId, PlayerId, FullModelType, LabelValues)>>,
    pub fail_at: Option<usize>,
}

impl Uploader for FakeUploader {
    fn submit(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        fmt: FullModelType,
        values: &LabelValues,
    ) -> Result<(), ApiError> {
        let mut calls = self.calls.borrow_mut();
        if self.fail_at == Some(calls.len()) {
            return Err(ApiError::Status {
                code: 400,
                message: format!("invalid {fmt} value for match {match_id}"),
            });
        }
        calls.push((match_id, player_id, fmt, values.clone()));
        Ok(())
    }
}
