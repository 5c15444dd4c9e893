//! JSON shapes exchanged with the labels API and their conversion into table rows.

use serde::{Deserialize, Serialize};

use crate::predictables::{LabelId, MatchId, PlayerId};
use crate::tables::{LabelRow, ManualChecks, MatchRecord};

use super::{ApiError, LabelValues};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct MatchWire {
    id: MatchId,
    filename: String,
    #[serde(default)]
    match_date: Option<String>,
    #[serde(default, alias = "dbdv_id")]
    dbd_version: Option<serde_json::Value>,
}

impl From<MatchWire> for MatchRecord {
    fn from(wire: MatchWire) -> Self {
        let dbd_version = wire.dbd_version.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });
        MatchRecord {
            id: wire.id,
            filename: wire.filename,
            match_date: wire.match_date,
            dbd_version,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct PlayerWire {
    id: i64,
    #[serde(default)]
    character_id: Option<LabelId>,
    #[serde(default)]
    perk_ids: Option<Vec<LabelId>>,
    #[serde(default)]
    item_id: Option<LabelId>,
    #[serde(default)]
    addon_ids: Option<Vec<LabelId>>,
    #[serde(default)]
    offering_id: Option<LabelId>,
    #[serde(default)]
    status_id: Option<LabelId>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct ManualChecksWire {
    #[serde(default)]
    predictables: ManualChecksPredictables,
}

/// Flags arrive as nullable booleans; null reads as unchecked.
#[derive(Clone, Debug, Default, Deserialize)]
struct ManualChecksPredictables {
    #[serde(default)]
    addons: Option<bool>,
    #[serde(default)]
    character: Option<bool>,
    #[serde(default)]
    item: Option<bool>,
    #[serde(default)]
    offering: Option<bool>,
    #[serde(default)]
    perks: Option<bool>,
    #[serde(default)]
    status: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct LabelWire {
    match_id: MatchId,
    player: PlayerWire,
    #[serde(default)]
    manual_checks: ManualChecksWire,
}

fn spread<const N: usize>(values: Option<Vec<LabelId>>) -> [Option<LabelId>; N] {
    let mut cells = [None; N];
    for (cell, value) in cells.iter_mut().zip(values.unwrap_or_default()) {
        *cell = Some(value);
    }
    cells
}

impl TryFrom<LabelWire> for LabelRow {
    type Error = ApiError;

    fn try_from(wire: LabelWire) -> Result<Self, Self::Error> {
        let player_id = PlayerId::try_from(wire.player.id)
            .ok()
            .filter(|id| *id <= crate::predictables::KILLER_PLAYER_ID)
            .ok_or(ApiError::InvalidPlayer {
                match_id: wire.match_id,
                player_id: wire.player.id,
            })?;
        let checks = wire.manual_checks.predictables;
        Ok(LabelRow {
            match_id: wire.match_id,
            player_id,
            character: wire.player.character_id,
            perks: spread(wire.player.perk_ids),
            item: wire.player.item_id,
            addons: spread(wire.player.addon_ids),
            offering: wire.player.offering_id,
            status: wire.player.status_id,
            manually_checked: ManualChecks {
                addons: checks.addons.unwrap_or(false),
                character: checks.character.unwrap_or(false),
                item: checks.item.unwrap_or(false),
                offering: checks.offering.unwrap_or(false),
                perks: checks.perks.unwrap_or(false),
                status: checks.status.unwrap_or(false),
            },
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct SubmitRequest<'a> {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub fmt: String,
    pub value: &'a LabelValues,
}
