//! Dropdown choices for the page in view.
//!
//! Every cell gets its own list because a declared correlation narrows a cell's choices by the
//! value another kind already holds for the same player (an addon list follows the item).

use std::collections::{HashMap, HashSet};

use crate::catalog::{self, CatalogEntry, Catalogs, TypeEntry, UNKNOWN_EMOJI};
use crate::labeling::{Labeler, LabelerError};
use crate::predictables::{FullModelType, LabelId, ModelType, Orientation};
use crate::tables::Dataset;

/// Emoji of the null entry in narrowed lists.
pub const NULL_EMOJI: &str = "❌";

/// A single dropdown choice: what the annotator reads and the id stored when picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub id: LabelId,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, id: LabelId) -> Self {
        Self {
            label: label.into(),
            id,
        }
    }
}

pub type OptionList = Vec<DropdownOption>;

/// What a cell's prerequisite value narrows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteKey {
    /// The prerequisite holds its null label; the cell keeps the full list.
    Null,
    /// A concrete value with no foreign key (e.g. an item missing from its catalog or untyped).
    Unmapped,
    Value(i64),
}

/// Catalog column that links a dependent entry to its prerequisite's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKey {
    PowerId,
    ItemId,
    TypeId,
}

impl ForeignKey {
    fn value(self, entry: &CatalogEntry) -> Option<i64> {
        match self {
            Self::PowerId => entry.power_id,
            Self::ItemId => entry.item_id,
            Self::TypeId => entry.type_id,
        }
    }
}

/// `dependent`'s choices depend on the value `prerequisite` holds for the same player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlation {
    pub dependent: FullModelType,
    pub prerequisite: FullModelType,
    pub foreign_key: ForeignKey,
    /// Match through the prerequisite's type id instead of its label id.
    pub via_type: bool,
    /// At most one dependent entry per prerequisite value.
    pub uniqueness: bool,
}

/// Correlation declared for `fmt`, if any.
pub fn correlation_for(fmt: FullModelType) -> Option<Correlation> {
    let item = FullModelType::new(ModelType::Item, fmt.orientation()).ok()?;
    let (foreign_key, via_type) = match (fmt.model_type(), fmt.orientation()) {
        (ModelType::Character, Orientation::Killer) => (ForeignKey::PowerId, false),
        (ModelType::Addons, Orientation::Killer) => (ForeignKey::ItemId, false),
        (ModelType::Addons, Orientation::Survivor) => (ForeignKey::TypeId, true),
        _ => return None,
    };
    Some(Correlation {
        dependent: fmt,
        prerequisite: item,
        foreign_key,
        via_type,
        uniqueness: false,
    })
}

/// Whether the option lists of `fmt` change with the page in view.
pub fn is_correlated(fmt: FullModelType) -> bool {
    correlation_for(fmt).is_some()
}

/// One option list per page cell for the labeler's kind.
pub fn options_for(
    labeler: &Labeler,
    data: &Dataset,
    catalogs: &Catalogs,
) -> Result<Vec<OptionList>, LabelerError> {
    let fmt = labeler.fmt();
    let base = base_options(fmt, catalogs);
    let total_cells = labeler.total_cells();
    let Some(correlation) = correlation_for(fmt) else {
        return Ok(vec![base; total_cells]);
    };

    let precond = labeler.filter_fmt_with_current(data, correlation.prerequisite)?;
    let keys = prerequisite_keys(&correlation, &precond, catalogs);
    if keys.iter().all(|key| *key == PrerequisiteKey::Null) {
        return Ok(vec![base; keys.len().max(total_cells)]);
    }

    let children = narrowed_options(&correlation, catalogs);
    let null_option = DropdownOption::new(format!("{NULL_EMOJI} {}", fmt.null_name()), fmt.null_id());
    Ok(resolve_cell_options(
        &base,
        &children,
        &keys,
        &null_option,
        correlation.uniqueness,
    ))
}

/// Per-cell lists given each cell's prerequisite key. Unmapped keys match no child and so
/// fall back to the null option alone.
///
/// `children` pairs each narrowed option with its foreign-key value, in catalog order.
pub fn resolve_cell_options(
    base: &OptionList,
    children: &[(i64, DropdownOption)],
    keys: &[PrerequisiteKey],
    null_option: &DropdownOption,
    uniqueness: bool,
) -> Vec<OptionList> {
    keys.iter()
        .map(|key| {
            let key = match *key {
                PrerequisiteKey::Null => return base.clone(),
                PrerequisiteKey::Unmapped => return vec![null_option.clone()],
                PrerequisiteKey::Value(key) => key,
            };
            let mut matching = children
                .iter()
                .filter(|(fk, _)| *fk == key)
                .map(|(_, option)| option.clone());
            if uniqueness {
                return vec![matching.next().unwrap_or_else(|| null_option.clone())];
            }
            let mut list = vec![null_option.clone()];
            list.extend(matching);
            list
        })
        .collect()
}

fn prerequisite_keys(
    correlation: &Correlation,
    precond: &[LabelId],
    catalogs: &Catalogs,
) -> Vec<PrerequisiteKey> {
    let prerequisite = correlation.prerequisite;
    let type_of: HashMap<LabelId, i64> = if correlation.via_type {
        catalogs
            .predictables(prerequisite)
            .iter()
            .filter_map(|entry| entry.type_id.map(|type_id| (entry.id, type_id)))
            .collect()
    } else {
        HashMap::new()
    };
    precond
        .iter()
        .map(|&value| {
            if prerequisite.model_type().is_null(value) {
                PrerequisiteKey::Null
            } else if correlation.via_type {
                type_of
                    .get(&value)
                    .map_or(PrerequisiteKey::Unmapped, |&type_id| {
                        PrerequisiteKey::Value(type_id)
                    })
            } else {
                PrerequisiteKey::Value(value)
            }
        })
        .collect()
}

fn narrowed_options(correlation: &Correlation, catalogs: &Catalogs) -> Vec<(i64, DropdownOption)> {
    let fmt = correlation.dependent;
    let model_type = fmt.model_type();
    let rarities = emoji_by_id(catalogs.rarities());
    let use_rarity = model_type.has_types() && !rarities.is_empty();

    let mut entries: Vec<(i64, &CatalogEntry)> = catalogs
        .predictables(fmt)
        .iter()
        .filter(|entry| entry.name != fmt.null_name())
        .filter(|entry| Some(entry.name.as_str()) != fmt.wrong_null_name())
        .filter_map(|entry| correlation.foreign_key.value(entry).map(|fk| (fk, entry)))
        .collect();
    if use_rarity {
        entries.sort_by(|(_, a), (_, b)| {
            (a.rarity_id.is_none(), a.rarity_id, &a.name).cmp(&(
                b.rarity_id.is_none(),
                b.rarity_id,
                &b.name,
            ))
        });
    }

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|(fk, entry)| {
            let emoji = if use_rarity {
                entry
                    .rarity_id
                    .and_then(|id| rarities.get(&id).cloned())
                    .or_else(|| entry.emoji.clone())
            } else {
                entry.emoji.clone()
            };
            let id = match model_type {
                ModelType::Character => entry.base_char_id.unwrap_or(entry.id),
                _ => entry.id,
            };
            (fk, DropdownOption::new(display_name(emoji.as_deref(), &entry.name), id))
        })
        // Legendary skins collapse onto their base character.
        .filter(|(fk, option)| seen.insert((*fk, option.id)))
        .collect()
}

/// Full choice list of a kind, before any correlation narrowing.
pub fn base_options(fmt: FullModelType, catalogs: &Catalogs) -> OptionList {
    if fmt.model_type().has_types() {
        options_with_types(fmt, catalogs)
    } else {
        options_without_types(fmt, catalogs)
    }
}

fn options_without_types(fmt: FullModelType, catalogs: &Catalogs) -> OptionList {
    let wrong_null = fmt.wrong_null_name();
    catalogs
        .predictables(fmt)
        .iter()
        .filter(|entry| Some(entry.name.as_str()) != wrong_null)
        .map(|entry| DropdownOption::new(display_name(entry.emoji.as_deref(), &entry.name), entry.id))
        .collect()
}

struct TypedEntry<'a> {
    entry: &'a CatalogEntry,
    emoji: String,
}

fn options_with_types(fmt: FullModelType, catalogs: &Catalogs) -> OptionList {
    let model_type = fmt.model_type();
    let orientation = fmt.orientation();
    let wrong_null = fmt.wrong_null_name();
    let types: HashMap<i64, &TypeEntry> = catalogs
        .types(model_type)
        .iter()
        .map(|t| (t.id, t))
        .collect();
    let power_emojis = if model_type == ModelType::Item && fmt.is_killer() {
        killer_power_emojis(catalogs)
    } else {
        HashMap::new()
    };

    let mut typed: Vec<TypedEntry<'_>> = catalogs
        .predictables(fmt)
        .iter()
        .filter(|entry| Some(entry.name.as_str()) != wrong_null)
        .filter(|entry| {
            let for_killer = entry
                .type_id
                .and_then(|id| types.get(&id))
                .and_then(|t| t.is_for_killer);
            for_killer.is_none_or(|for_killer| for_killer == fmt.is_killer())
        })
        .map(|entry| {
            let emoji = if power_emojis.is_empty() {
                entry
                    .type_id
                    .and_then(|id| types.get(&id))
                    .and_then(|t| t.emoji.clone())
            } else {
                power_emojis.get(&entry.id).cloned()
            };
            TypedEntry {
                entry,
                emoji: emoji.unwrap_or_else(|| UNKNOWN_EMOJI.to_string()),
            }
        })
        .collect();
    typed.sort_by(|a, b| {
        (a.entry.type_id.is_none(), a.entry.type_id, &a.entry.name).cmp(&(
            b.entry.type_id.is_none(),
            b.entry.type_id,
            &b.entry.name,
        ))
    });

    let typed = hoist_most_used(typed, fmt);
    let typed = sink_deprioritized(typed, model_type, orientation, fmt.null_name());

    typed
        .into_iter()
        .map(|t| DropdownOption::new(display_name(Some(&t.emoji), &t.entry.name), t.entry.id))
        .collect()
}

/// Null entry first, then the most-used shortlist in its own order, then everything else.
fn hoist_most_used<'a>(typed: Vec<TypedEntry<'a>>, fmt: FullModelType) -> Vec<TypedEntry<'a>> {
    let shortlist = catalog::most_used(fmt.model_type(), fmt.orientation());
    let mut front_names: Vec<&str> = vec![fmt.null_name()];
    front_names.extend_from_slice(shortlist);

    let mut rest: Vec<Option<TypedEntry<'a>>> = typed.into_iter().map(Some).collect();
    let mut front = Vec::with_capacity(front_names.len());
    for name in front_names {
        let found = rest
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|t| t.entry.name == name))
            .and_then(Option::take);
        match found {
            Some(entry) => front.push(entry),
            None if name != fmt.null_name() => {
                tracing::warn!(%fmt, name, "Most-used entry missing from catalog");
            }
            None => {}
        }
    }
    front.extend(rest.into_iter().flatten());
    front
}

/// Move entries of rare or unobtainable types to the back, keeping the null entry in place.
fn sink_deprioritized<'a>(
    typed: Vec<TypedEntry<'a>>,
    model_type: ModelType,
    orientation: Orientation,
    null_name: &str,
) -> Vec<TypedEntry<'a>> {
    let back_types = catalog::deprioritized_types(model_type, orientation);
    if back_types.is_empty() {
        return typed;
    }
    let (mut front, back): (Vec<_>, Vec<_>) = typed.into_iter().partition(|t| {
        t.entry.name == null_name || !t.entry.type_id.is_some_and(|id| back_types.contains(&id))
    });
    front.extend(back);
    front
}

/// Killer items are powers; they borrow the emoji of the base killer using them.
fn killer_power_emojis(catalogs: &Catalogs) -> HashMap<LabelId, String> {
    let Ok(killers) = FullModelType::new(ModelType::Character, Orientation::Killer) else {
        return HashMap::new();
    };
    catalogs
        .predictables(killers)
        .iter()
        .filter(|entry| entry.base_char_id == Some(entry.id))
        .filter_map(|entry| Some((entry.power_id?, entry.emoji.clone()?)))
        .collect()
}

fn emoji_by_id(types: &[TypeEntry]) -> HashMap<i64, String> {
    types
        .iter()
        .filter_map(|t| Some((t.id, t.emoji.clone()?)))
        .collect()
}

fn display_name(emoji: Option<&str>, name: &str) -> String {
    match emoji {
        Some(emoji) if !emoji.is_empty() => format!("{emoji} {name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: &str) -> FullModelType {
        value.parse().unwrap()
    }

    fn typed(id: LabelId, name: &str, type_id: i64) -> CatalogEntry {
        CatalogEntry {
            type_id: Some(type_id),
            ..CatalogEntry::new(id, name)
        }
    }

    #[test]
    fn correlations_cover_character_and_addons() {
        let killer_char = correlation_for(fmt("character__killer")).unwrap();
        assert_eq!(killer_char.prerequisite, fmt("item__killer"));
        assert_eq!(killer_char.foreign_key, ForeignKey::PowerId);

        let surv_addons = correlation_for(fmt("addons__surv")).unwrap();
        assert!(surv_addons.via_type);
        assert_eq!(surv_addons.prerequisite, fmt("item__surv"));

        assert!(correlation_for(fmt("perks__surv")).is_none());
        assert!(!is_correlated(fmt("character__surv")));
    }

    #[test]
    fn null_prerequisite_keeps_base_list() {
        let base = vec![DropdownOption::new("a", 1), DropdownOption::new("b", 2)];
        let null = DropdownOption::new("❌ NoKillerAddon", 0);
        let keys = [PrerequisiteKey::Null, PrerequisiteKey::Null];
        let lists = resolve_cell_options(&base, &[], &keys, &null, false);
        assert_eq!(lists, vec![base.clone(), base]);
    }

    #[test]
    fn concrete_prerequisite_narrows_to_null_plus_children() {
        let base = vec![DropdownOption::new("all", 9)];
        let null = DropdownOption::new("❌ NoKillerAddon", 0);
        let children = vec![
            (7, DropdownOption::new("Addon A", 11)),
            (8, DropdownOption::new("Addon X", 20)),
            (7, DropdownOption::new("Addon B", 12)),
        ];
        let keys = [
            PrerequisiteKey::Value(7),
            PrerequisiteKey::Value(5),
            PrerequisiteKey::Unmapped,
        ];
        let lists = resolve_cell_options(&base, &children, &keys, &null, false);
        assert_eq!(
            lists[0],
            vec![
                null.clone(),
                DropdownOption::new("Addon A", 11),
                DropdownOption::new("Addon B", 12),
            ]
        );
        assert_eq!(lists[1], vec![null.clone()]);
        assert_eq!(lists[2], vec![null]);
    }

    #[test]
    fn unique_correlation_yields_single_entry_or_null() {
        let null = DropdownOption::new("❌ NoKillerCharacter", 1);
        let children = vec![(3, DropdownOption::new("Trapper", 30))];
        let lists = resolve_cell_options(
            &vec![],
            &children,
            &[PrerequisiteKey::Value(3), PrerequisiteKey::Value(4), PrerequisiteKey::Unmapped],
            &null,
            true,
        );
        assert_eq!(lists[0], vec![DropdownOption::new("Trapper", 30)]);
        assert_eq!(lists[1], vec![null.clone()]);
        assert_eq!(lists[2], vec![null]);
    }

    #[test]
    fn typed_options_hoist_most_used_after_null() {
        let items = fmt("item__surv");
        let mut catalogs = Catalogs::new();
        catalogs.insert_predictables(
            items,
            vec![
                typed(1, "NoSurvItem", 0),
                typed(0, "NoKillerItem", 0),
                typed(10, "Broken Key", 2),
                typed(11, "Toolbox", 3),
                typed(12, "Flashlight", 1),
                typed(13, "Party Starter", 7),
                typed(14, "Anniversary Flashlight", 1),
            ],
        );
        catalogs.insert_types(
            ModelType::Item,
            vec![
                TypeEntry { id: 0, emoji: None, is_for_killer: None },
                TypeEntry { id: 1, emoji: Some("🔦".into()), is_for_killer: Some(false) },
                TypeEntry { id: 2, emoji: Some("🔑".into()), is_for_killer: Some(false) },
                TypeEntry { id: 3, emoji: Some("🧰".into()), is_for_killer: Some(false) },
                TypeEntry { id: 7, emoji: Some("🎉".into()), is_for_killer: Some(false) },
            ],
        );

        let labels: Vec<_> = base_options(items, &catalogs)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "❓ NoSurvItem",
                "🔦 Flashlight",
                "🧰 Toolbox",
                "🔦 Anniversary Flashlight",
                "🔑 Broken Key",
                "🎉 Party Starter",
            ]
        );
    }

    #[test]
    fn typed_options_drop_other_orientation_and_sink_rare_types() {
        let addons = fmt("addons__surv");
        let mut catalogs = Catalogs::new();
        catalogs.insert_predictables(
            addons,
            vec![
                typed(1, "NoSurvAddon", 0),
                typed(40, "Battery", 1),
                typed(41, "Iridescent Stone", 9),
                typed(42, "Odd Bulb", 3),
                typed(44, "Bandage", 5),
            ],
        );
        catalogs.insert_types(
            ModelType::Addons,
            vec![
                TypeEntry { id: 1, emoji: Some("🔦".into()), is_for_killer: Some(false) },
                TypeEntry { id: 3, emoji: Some("🗺️".into()), is_for_killer: Some(false) },
                TypeEntry { id: 5, emoji: Some("🩹".into()), is_for_killer: Some(false) },
                TypeEntry { id: 9, emoji: Some("🪨".into()), is_for_killer: Some(true) },
            ],
        );
        let ids: Vec<_> = base_options(addons, &catalogs).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 40, 44, 42]);
    }

    #[test]
    fn killer_items_borrow_base_killer_emoji() {
        let mut catalogs = Catalogs::new();
        let mut trapper = CatalogEntry::new(3, "The Trapper");
        trapper.emoji = Some("🪤".into());
        trapper.power_id = Some(20);
        trapper.base_char_id = Some(3);
        let mut skin = CatalogEntry::new(9, "The Trapper (Legendary)");
        skin.emoji = Some("🎭".into());
        skin.power_id = Some(20);
        skin.base_char_id = Some(3);
        catalogs.insert_predictables(fmt("character__killer"), vec![trapper, skin]);
        catalogs.insert_predictables(
            fmt("item__killer"),
            vec![typed(0, "NoKillerItem", 0), typed(20, "Bear Trap", 1)],
        );

        let options = base_options(fmt("item__killer"), &catalogs);
        assert_eq!(options[0], DropdownOption::new("❓ NoKillerItem", 0));
        assert_eq!(options[1], DropdownOption::new("🪤 Bear Trap", 20));
    }

    #[test]
    fn narrowed_characters_collapse_skins_onto_base() {
        let mut catalogs = Catalogs::new();
        let mut trapper = CatalogEntry::new(3, "The Trapper");
        trapper.power_id = Some(20);
        trapper.base_char_id = Some(3);
        let mut skin = CatalogEntry::new(9, "The Trapper (Legendary)");
        skin.power_id = Some(20);
        skin.base_char_id = Some(3);
        catalogs.insert_predictables(
            fmt("character__killer"),
            vec![CatalogEntry::new(1, "NoKillerCharacter"), trapper, skin],
        );
        let correlation = correlation_for(fmt("character__killer")).unwrap();
        let children = narrowed_options(&correlation, &catalogs);
        assert_eq!(children, vec![(20, DropdownOption::new("The Trapper", 3))]);
    }

    #[test]
    fn untyped_options_keep_catalog_order_and_skip_wrong_null() {
        let perks = fmt("perks__killer");
        let mut catalogs = Catalogs::new();
        let mut hex = CatalogEntry::new(7, "Hex: Ruin");
        hex.emoji = Some("🔥".into());
        catalogs.insert_predictables(
            perks,
            vec![
                hex,
                CatalogEntry::new(0, "NoKillerPerk"),
                CatalogEntry::new(1, "NoSurvPerk"),
                CatalogEntry::new(8, "Barbecue & Chilli"),
            ],
        );
        assert_eq!(
            base_options(perks, &catalogs),
            vec![
                DropdownOption::new("NoKillerPerk", 0),
                DropdownOption::new("Barbecue & Chilli", 8),
                DropdownOption::new("🔥 Hex: Ruin", 7),
            ]
        );
    }
}
