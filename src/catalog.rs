//! Reference catalogs of predictable values (perks, items, addons, ...) and their types.

use std::collections::HashMap;

use serde::Deserialize;

use crate::predictables::{FullModelType, LabelId, ModelType, Orientation};

/// Emoji shown when an entry or its type has none.
pub const UNKNOWN_EMOJI: &str = "❓";

/// One selectable value of a predictable kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: LabelId,
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub rarity_id: Option<i64>,
    /// Killer power a killer character uses.
    #[serde(default)]
    pub power_id: Option<i64>,
    /// Killer power an addon belongs to.
    #[serde(default)]
    pub item_id: Option<i64>,
    /// Base character of a legendary skin (equal to `id` for base characters).
    #[serde(default)]
    pub base_char_id: Option<LabelId>,
}

impl CatalogEntry {
    pub fn new(id: LabelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            emoji: None,
            type_id: None,
            rarity_id: None,
            power_id: None,
            item_id: None,
            base_char_id: None,
        }
    }
}

/// Grouping row of a type catalog (item types, addon types, rarities).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeEntry {
    pub id: i64,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub is_for_killer: Option<bool>,
}

/// Every catalog the option resolver may need, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    predictables: HashMap<FullModelType, Vec<CatalogEntry>>,
    types: HashMap<ModelType, Vec<TypeEntry>>,
    rarities: Vec<TypeEntry>,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a predictable catalog, normalized: null rows first, the rest sorted by name.
    pub fn insert_predictables(&mut self, fmt: FullModelType, entries: Vec<CatalogEntry>) {
        self.predictables
            .insert(fmt, normalize_entries(fmt.model_type(), entries));
    }

    pub fn insert_types(&mut self, model_type: ModelType, types: Vec<TypeEntry>) {
        self.types.insert(model_type, types);
    }

    pub fn set_rarities(&mut self, rarities: Vec<TypeEntry>) {
        self.rarities = rarities;
    }

    pub fn predictables(&self, fmt: FullModelType) -> &[CatalogEntry] {
        self.predictables.get(&fmt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn types(&self, model_type: ModelType) -> &[TypeEntry] {
        self.types.get(&model_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rarities(&self) -> &[TypeEntry] {
        &self.rarities
    }

    pub fn entry(&self, fmt: FullModelType, id: LabelId) -> Option<&CatalogEntry> {
        self.predictables(fmt).iter().find(|entry| entry.id == id)
    }
}

fn normalize_entries(model_type: ModelType, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let null_names: Vec<&str> = Orientation::BOTH
        .into_iter()
        .filter(|o| model_type.supports(*o))
        .map(|o| model_type.null_name(o))
        .collect();
    let (mut nulls, mut rest): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| null_names.contains(&entry.name.as_str()));
    rest.sort_by(|a, b| a.name.cmp(&b.name));
    nulls.append(&mut rest);
    nulls
}

/// Entries hoisted right after the null entry because annotators pick them most often.
pub fn most_used(model_type: ModelType, orientation: Orientation) -> &'static [&'static str] {
    match (model_type, orientation) {
        (ModelType::Item, Orientation::Survivor) => &[
            "Flashlight",
            "Sport Flashlight",
            "Utility Flashlight",
            "Camping Aid Kit",
            "First Aid Kit",
            "Emergency Med-Kit",
            "Ranger Med-Kit",
            "Worn-Out Tools",
            "Toolbox",
            "Commodious Toolbox",
            "Mechanic's Toolbox",
            "Alex's Toolbox",
            "Engineer's Toolbox",
        ],
        (ModelType::Offering, Orientation::Killer) => &[
            "Bloody Party Streamers",
            "Survivor Pudding",
            "Screech Cobbler",
            "Terrormisu",
            "Black Ward",
            "Putrid Oak",
            "Cypress Memento Mori",
            "Ebony Memento Mori",
            "Ivory Memento Mori",
            "Annotated Blueprint",
            "Vigo's Blueprint",
            "Bloodied Blueprint",
            "Torn Blueprint",
            "Azarov's Key",
            "Heart Locket",
            "Jigsaw Piece",
            "MacMillan's Phalanx Bone",
            "RPD Badge",
        ],
        (ModelType::Offering, Orientation::Survivor) => &[
            "Bloody Party Streamers",
            "Bound Envelope",
            "Escape! Cake",
            "Sealed Envelope",
            "Petrified Oak",
            "Annotated Blueprint",
            "Vigo's Blueprint",
            "Bloodied Blueprint",
            "Torn Blueprint",
            "White Ward",
        ],
        _ => &[],
    }
}

/// Type ids that are rarely seen or no longer obtainable; their entries go last.
pub fn deprioritized_types(model_type: ModelType, orientation: Orientation) -> &'static [i64] {
    match (model_type, orientation) {
        (ModelType::Addons, Orientation::Survivor) => &[3, 4, 7],
        (ModelType::Offering, _) => &[3, 6, 9, 12, 13],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_puts_nulls_first_and_sorts_rest() {
        let fmt = "perks__surv".parse().unwrap();
        let mut catalogs = Catalogs::new();
        catalogs.insert_predictables(
            fmt,
            vec![
                CatalogEntry::new(5, "Sprint Burst"),
                CatalogEntry::new(0, "NoKillerPerk"),
                CatalogEntry::new(3, "Adrenaline"),
                CatalogEntry::new(1, "NoSurvPerk"),
            ],
        );
        let names: Vec<_> = catalogs
            .predictables(fmt)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["NoKillerPerk", "NoSurvPerk", "Adrenaline", "Sprint Burst"]
        );
        assert_eq!(catalogs.entry(fmt, 3).map(|e| e.name.as_str()), Some("Adrenaline"));
    }

    #[test]
    fn missing_catalogs_are_empty() {
        let catalogs = Catalogs::new();
        assert!(catalogs.predictables("item__killer".parse().unwrap()).is_empty());
        assert!(catalogs.types(ModelType::Addons).is_empty());
    }

    #[test]
    fn shortlists_are_kind_specific() {
        assert_eq!(most_used(ModelType::Item, Orientation::Survivor)[0], "Flashlight");
        assert!(most_used(ModelType::Item, Orientation::Killer).is_empty());
        assert_eq!(deprioritized_types(ModelType::Addons, Orientation::Killer), &[] as &[i64]);
    }
}
