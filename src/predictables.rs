//! Predictable kinds and the player orientation they are labeled for.
//!
//! A [`FullModelType`] pairs a [`ModelType`] with an [`Orientation`] and is the key of every
//! labeling session. The static facts of each kind (label columns, null ids, which orientations
//! are legal) live here so the rest of the crate never matches on strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a predictable value (perk id, item id, ...).
pub type LabelId = i64;
/// Identifier of a match.
pub type MatchId = i64;
/// Player slot inside a match: 0-3 are survivors, 4 is the killer.
pub type PlayerId = u8;

/// Player slot reserved for the killer.
pub const KILLER_PLAYER_ID: PlayerId = 4;
/// Cells shown on a single labeling page.
pub const TOTAL_CELLS: usize = 16;

/// Category of label being collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Addons,
    Character,
    Item,
    Offering,
    Perks,
    Status,
}

/// Which player slots a session covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[serde(alias = "surv")]
    Survivor,
    Killer,
}

/// Errors raised when naming a kind or a kind/orientation pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictableError {
    #[error("Unknown model type: {0}")]
    UnknownModelType(String),
    #[error("Unknown player type: {0}")]
    UnknownOrientation(String),
    #[error("Invalid full model type: {0}")]
    InvalidFullModelType(String),
    #[error("{model_type} cannot be labeled for {orientation}")]
    IllegalCombination {
        model_type: ModelType,
        orientation: Orientation,
    },
}

impl ModelType {
    /// Kinds labeled through the multiple-choice dropdowns, in display order.
    pub const ALL: [ModelType; 6] = [
        ModelType::Character,
        ModelType::Perks,
        ModelType::Item,
        ModelType::Addons,
        ModelType::Offering,
        ModelType::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Addons => "addons",
            Self::Character => "character",
            Self::Item => "item",
            Self::Offering => "offering",
            Self::Perks => "perks",
            Self::Status => "status",
        }
    }

    /// Number of label columns a player row holds for this kind.
    pub const fn n_items(self) -> usize {
        match self {
            Self::Perks => 4,
            Self::Addons => 2,
            Self::Character | Self::Item | Self::Offering | Self::Status => 1,
        }
    }

    pub const fn supports(self, orientation: Orientation) -> bool {
        match self {
            Self::Status => matches!(orientation, Orientation::Survivor),
            _ => true,
        }
    }

    /// Whether the kind has a companion type catalog (item types, addon types, ...).
    pub const fn has_types(self) -> bool {
        matches!(self, Self::Item | Self::Addons | Self::Offering)
    }

    /// Label id that stands for "nothing here" for this kind and orientation.
    pub const fn null_id(self, orientation: Orientation) -> LabelId {
        match (self, orientation) {
            (Self::Character, Orientation::Survivor) => 2,
            (Self::Character, Orientation::Killer) => 1,
            (Self::Status, _) => 0,
            (_, Orientation::Survivor) => 1,
            (_, Orientation::Killer) => 0,
        }
    }

    /// Catalog name of the null entry for this kind and orientation.
    pub const fn null_name(self, orientation: Orientation) -> &'static str {
        match (self, orientation) {
            (Self::Addons, Orientation::Survivor) => "NoSurvAddon",
            (Self::Addons, Orientation::Killer) => "NoKillerAddon",
            (Self::Character, Orientation::Survivor) => "NoSurvCharacter",
            (Self::Character, Orientation::Killer) => "NoKillerCharacter",
            (Self::Item, Orientation::Survivor) => "NoSurvItem",
            (Self::Item, Orientation::Killer) => "NoKillerItem",
            (Self::Offering, Orientation::Survivor) => "NoSurvOffering",
            (Self::Offering, Orientation::Killer) => "NoKillerOffering",
            (Self::Perks, Orientation::Survivor) => "NoSurvPerk",
            (Self::Perks, Orientation::Killer) => "NoKillerPerk",
            (Self::Status, _) => "NoStatus",
        }
    }

    /// True when `id` is this kind's null id for either orientation.
    pub fn is_null(self, id: LabelId) -> bool {
        [Orientation::Survivor, Orientation::Killer]
            .into_iter()
            .filter(|orientation| self.supports(*orientation))
            .any(|orientation| self.null_id(orientation) == id)
    }
}

impl Orientation {
    pub const BOTH: [Orientation; 2] = [Orientation::Survivor, Orientation::Killer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Survivor => "surv",
            Self::Killer => "killer",
        }
    }

    pub const fn is_killer(self) -> bool {
        matches!(self, Self::Killer)
    }

    /// Whether a label-table row in `player_id` belongs to this orientation.
    pub const fn covers(self, player_id: PlayerId) -> bool {
        (player_id == KILLER_PLAYER_ID) == self.is_killer()
    }

    pub fn other(self) -> Self {
        match self {
            Self::Survivor => Self::Killer,
            Self::Killer => Self::Survivor,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = PredictableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        ModelType::ALL
            .into_iter()
            .find(|mt| mt.as_str() == lowered)
            .ok_or_else(|| PredictableError::UnknownModelType(value.to_string()))
    }
}

impl FromStr for Orientation {
    type Err = PredictableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "surv" | "survivor" => Ok(Self::Survivor),
            "killer" => Ok(Self::Killer),
            _ => Err(PredictableError::UnknownOrientation(value.to_string())),
        }
    }
}

/// A predictable kind bound to an orientation, e.g. `perks__surv`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullModelType {
    model_type: ModelType,
    orientation: Orientation,
}

impl FullModelType {
    /// Build a full model type, rejecting combinations the kind does not support.
    pub fn new(model_type: ModelType, orientation: Orientation) -> Result<Self, PredictableError> {
        if !model_type.supports(orientation) {
            return Err(PredictableError::IllegalCombination {
                model_type,
                orientation,
            });
        }
        Ok(Self {
            model_type,
            orientation,
        })
    }

    /// Every legal kind/orientation pair.
    pub fn all() -> Vec<Self> {
        ModelType::ALL
            .into_iter()
            .flat_map(|mt| Orientation::BOTH.into_iter().map(move |o| (mt, o)))
            .filter_map(|(mt, o)| Self::new(mt, o).ok())
            .collect()
    }

    pub fn model_type(self) -> ModelType {
        self.model_type
    }

    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    pub fn is_killer(self) -> bool {
        self.orientation.is_killer()
    }

    pub fn null_id(self) -> LabelId {
        self.model_type.null_id(self.orientation)
    }

    pub fn null_name(self) -> &'static str {
        self.model_type.null_name(self.orientation)
    }

    /// Null name used by the same kind for the opposite orientation, if that pair is legal.
    pub fn wrong_null_name(self) -> Option<&'static str> {
        let other = self.orientation.other();
        self.model_type
            .supports(other)
            .then(|| self.model_type.null_name(other))
    }

    pub fn n_items(self) -> usize {
        self.model_type.n_items()
    }
}

impl fmt::Display for FullModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.model_type, self.orientation)
    }
}

impl FromStr for FullModelType {
    type Err = PredictableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (mt, pt) = value
            .split_once("__")
            .ok_or_else(|| PredictableError::InvalidFullModelType(value.to_string()))?;
        Self::new(mt.parse()?, pt.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_fills_a_page_evenly() {
        for mt in ModelType::ALL {
            assert_eq!(TOTAL_CELLS % mt.n_items(), 0, "{mt}");
        }
    }

    #[test]
    fn full_model_type_round_trips_through_display() {
        let fmt: FullModelType = "perks__surv".parse().unwrap();
        assert_eq!(fmt.model_type(), ModelType::Perks);
        assert_eq!(fmt.orientation(), Orientation::Survivor);
        assert_eq!(fmt.to_string(), "perks__surv");
        assert_eq!(
            "addons__killer".parse::<FullModelType>().unwrap().null_id(),
            0
        );
    }

    #[test]
    fn status_is_survivor_only() {
        assert_eq!(
            FullModelType::new(ModelType::Status, Orientation::Killer),
            Err(PredictableError::IllegalCombination {
                model_type: ModelType::Status,
                orientation: Orientation::Killer,
            })
        );
        assert_eq!(FullModelType::all().len(), 11);
        let status = FullModelType::new(ModelType::Status, Orientation::Survivor).unwrap();
        assert_eq!(status.wrong_null_name(), None);
    }

    #[test]
    fn orientation_covers_matching_slots() {
        assert!(Orientation::Killer.covers(4));
        assert!(!Orientation::Killer.covers(0));
        assert!(Orientation::Survivor.covers(3));
        assert!(!Orientation::Survivor.covers(4));
    }

    #[test]
    fn null_ids_follow_kind_and_orientation() {
        assert_eq!(ModelType::Character.null_id(Orientation::Survivor), 2);
        assert_eq!(ModelType::Character.null_id(Orientation::Killer), 1);
        assert_eq!(ModelType::Item.null_id(Orientation::Survivor), 1);
        assert!(ModelType::Perks.is_null(0));
        assert!(!ModelType::Status.is_null(1));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(matches!(
            "perks".parse::<FullModelType>(),
            Err(PredictableError::InvalidFullModelType(_))
        ));
        assert!(matches!(
            "hats__surv".parse::<FullModelType>(),
            Err(PredictableError::UnknownModelType(_))
        ));
    }
}
