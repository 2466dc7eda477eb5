//! Wire payload types for the consumed PokéAPI endpoints.
//!
//! These mirror the remote JSON shapes and are deserialized verbatim;
//! the domain types in [`types`](crate::types) are built from them so
//! the rest of the crate never touches raw payload structure.

use serde::Deserialize;

/// A `{name, url}` reference, the API's universal resource pointer.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// A bare `{url}` reference.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlResource {
    pub url: String,
}

// ============================================================================
// GET /pokemon/?offset={o}&limit={l}
// ============================================================================

/// Paged collection listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    /// Total number of entries in the collection.
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

// ============================================================================
// GET /pokemon/{id or name}
// ============================================================================

/// Full detail payload for a single pokemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprites: SpriteSet,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub species: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    pub is_hidden: bool,
    pub slot: u32,
}

// ============================================================================
// GET /type/{tag}
// ============================================================================

/// Type membership listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedResource,
    pub slot: u32,
}

// ============================================================================
// GET /pokemon-species/{id}
// ============================================================================

/// Species metadata payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesResponse {
    pub id: u32,
    pub name: String,
    pub generation: NamedResource,
    pub evolution_chain: UrlResource,
    #[serde(default)]
    pub genera: Vec<Genus>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genus {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

// ============================================================================
// Evolution chain resource (linked from the species payload)
// ============================================================================

/// Evolution chain payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainResponse {
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of the evolution tree.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionDetail {
    pub trigger: Option<NamedResource>,
    pub min_level: Option<u32>,
    pub item: Option<NamedResource>,
}
