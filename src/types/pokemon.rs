//! Domain records for pokemon summaries and full details.

use serde::{Deserialize, Serialize};

use super::PokemonType;
use super::api::DetailResponse;

/// A named base stat with its display name (e.g. "HP", "Sp. Atk").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// An ability, with the hidden-ability flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
}

/// The sprite set kept on a full detail record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
    pub official_artwork: Option<String>,
}

/// Lightweight summary record used by listings.
///
/// Immutable once cached. The listing cache stores these by *position*
/// within the declared total, not by id — the remote collection's ids
/// are not densely packed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    /// Primary display image URL; empty when the API has no sprite.
    pub image: String,
    pub types: Vec<PokemonType>,
}

/// Full record for a single pokemon, keyed by id in the detail cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub sprites: Sprites,
    pub types: Vec<PokemonType>,
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    /// Height in decimetres, as reported by the API.
    pub height: u32,
    /// Weight in hectograms, as reported by the API.
    pub weight: u32,
    /// Back-reference to the species metadata resource.
    pub species_url: String,
}

impl PokemonSummary {
    /// Build a summary from a raw detail payload.
    pub(crate) fn from_detail(raw: &DetailResponse) -> Self {
        Self {
            id: raw.id,
            name: raw.name.clone(),
            image: display_image(raw),
            types: parse_types(raw),
        }
    }
}

impl Pokemon {
    /// Build a full record from a raw detail payload.
    pub(crate) fn from_detail(raw: DetailResponse) -> Self {
        let image = display_image(&raw);
        let types = parse_types(&raw);
        let official_artwork = raw
            .sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.clone());

        Self {
            id: raw.id,
            name: raw.name,
            image,
            sprites: Sprites {
                front_default: raw.sprites.front_default,
                front_shiny: raw.sprites.front_shiny,
                back_default: raw.sprites.back_default,
                back_shiny: raw.sprites.back_shiny,
                official_artwork,
            },
            types,
            stats: raw
                .stats
                .into_iter()
                .map(|slot| Stat {
                    name: display_stat_name(&slot.stat.name),
                    value: slot.base_stat,
                })
                .collect(),
            abilities: raw
                .abilities
                .into_iter()
                .map(|slot| Ability {
                    name: slot.ability.name.replace('-', " "),
                    hidden: slot.is_hidden,
                })
                .collect(),
            height: raw.height,
            weight: raw.weight,
            species_url: raw.species.url,
        }
    }
}

/// Pick the primary display image: official artwork when present,
/// falling back to the default front sprite.
fn display_image(raw: &DetailResponse) -> String {
    raw.sprites
        .other
        .as_ref()
        .and_then(|other| other.official_artwork.as_ref())
        .and_then(|art| art.front_default.clone())
        .or_else(|| raw.sprites.front_default.clone())
        .unwrap_or_default()
}

/// Parse type slots, dropping tags this crate does not know.
fn parse_types(raw: &DetailResponse) -> Vec<PokemonType> {
    raw.types
        .iter()
        .filter_map(|slot| slot.kind.name.parse().ok())
        .collect()
}

/// Map raw stat identifiers to their display names.
fn display_stat_name(name: &str) -> String {
    match name {
        "hp" => "HP",
        "attack" => "Attack",
        "defense" => "Defense",
        "special-attack" => "Sp. Atk",
        "special-defense" => "Sp. Def",
        "speed" => "Speed",
        other => other,
    }
    .to_string()
}

/// Zero-padded dex number, e.g. `25` → `"025"`.
pub fn dex_number(id: u32) -> String {
    format!("{id:03}")
}

/// Render an API height (decimetres) as metres, e.g. `7` → `"0.7 m"`.
pub fn format_height(height: u32) -> String {
    format!("{:.1} m", height as f64 / 10.0)
}

/// Render an API weight (hectograms) as kilograms, e.g. `69` → `"6.9 kg"`.
pub fn format_weight(weight: u32) -> String {
    format!("{:.1} kg", weight as f64 / 10.0)
}

/// Uppercase the first character, e.g. `"pikachu"` → `"Pikachu"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
