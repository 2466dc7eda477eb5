//! Species metadata and evolution chains.
//!
//! A pokemon's evolution line is reached in two hops: the species
//! resource links the chain resource, and the chain is a small tree of
//! `evolves_to` nodes. [`EvolutionClient`] flattens that tree into an
//! ordered list of steps and keeps both hops in per-id caches — species
//! and chains are tiny and immutable, so the maps are unbounded.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::client::PokeApiClient;
use crate::types::api::{ChainLink, SpeciesResponse};
use crate::Result;

/// Base URL for official-artwork images, addressed by id.
const ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Trimmed species metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub id: u32,
    pub name: String,
    pub evolution_chain_url: String,
    pub generation: u32,
    /// English flavor text, form feeds replaced by spaces.
    pub flavor_text: String,
    /// English genus (e.g. "Seed Pokémon").
    pub genus: String,
}

/// One stage of an evolution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStep {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub min_level: Option<u32>,
    pub trigger: Option<String>,
    pub item: Option<String>,
}

/// A flattened evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionChain {
    pub id: u32,
    pub steps: Vec<EvolutionStep>,
}

/// Client for species metadata and evolution chains.
pub struct EvolutionClient {
    client: PokeApiClient,
    species_cache: Mutex<HashMap<u32, SpeciesInfo>>,
    chain_cache: Mutex<HashMap<u32, EvolutionChain>>,
}

impl EvolutionClient {
    /// Create a client on top of an API client.
    pub fn new(client: PokeApiClient) -> Self {
        Self {
            client,
            species_cache: Mutex::new(HashMap::new()),
            chain_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch species metadata for a pokemon id.
    ///
    /// `Ok(None)` when the species does not exist; transport and server
    /// errors propagate.
    pub async fn species_info(&self, pokemon_id: u32) -> Result<Option<SpeciesInfo>> {
        if let Some(info) = self.species_cache.lock().get(&pokemon_id).cloned() {
            return Ok(Some(info));
        }

        match self.client.species(pokemon_id).await {
            Ok(raw) => {
                let info = SpeciesInfo::from_response(raw);
                self.species_cache.lock().insert(pokemon_id, info.clone());
                Ok(Some(info))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch and flatten the evolution chain for a pokemon id.
    ///
    /// `Ok(None)` when the species (or its chain) does not exist.
    pub async fn evolution_chain(&self, pokemon_id: u32) -> Result<Option<EvolutionChain>> {
        let species = match self.species_info(pokemon_id).await? {
            Some(species) => species,
            None => return Ok(None),
        };
        let Some(chain_id) = trailing_number(&species.evolution_chain_url) else {
            return Ok(None);
        };

        if let Some(chain) = self.chain_cache.lock().get(&chain_id).cloned() {
            return Ok(Some(chain));
        }

        match self.client.evolution_chain_url(&species.evolution_chain_url).await {
            Ok(raw) => {
                let chain = EvolutionChain {
                    id: chain_id,
                    steps: flatten_chain(&raw.chain),
                };
                self.chain_cache.lock().insert(chain_id, chain.clone());
                Ok(Some(chain))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl SpeciesInfo {
    fn from_response(raw: SpeciesResponse) -> Self {
        let flavor_text = raw
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.flavor_text.replace('\u{c}', " "))
            .unwrap_or_default();
        let genus = raw
            .genera
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.genus.clone())
            .unwrap_or_default();

        Self {
            id: raw.id,
            name: raw.name,
            generation: trailing_number(&raw.generation.url).unwrap_or(0),
            evolution_chain_url: raw.evolution_chain.url,
            flavor_text,
            genus,
        }
    }
}

/// Flatten the evolution tree in preorder.
fn flatten_chain(root: &ChainLink) -> Vec<EvolutionStep> {
    let mut steps = Vec::new();
    walk_chain(root, &mut steps);
    steps
}

fn walk_chain(node: &ChainLink, steps: &mut Vec<EvolutionStep>) {
    let id = trailing_number(&node.species.url).unwrap_or(0);
    let details = node.evolution_details.first();

    steps.push(EvolutionStep {
        id,
        name: node.species.name.clone(),
        image: format!("{ARTWORK_BASE_URL}/{id}.png"),
        min_level: details.and_then(|d| d.min_level),
        trigger: details.and_then(|d| d.trigger.as_ref().map(|t| t.name.clone())),
        item: details.and_then(|d| d.item.as_ref().map(|i| i.name.clone())),
    });

    for evolution in &node.evolves_to {
        walk_chain(evolution, steps);
    }
}

/// Last numeric path segment of a resource URL, e.g. `.../generation/1/` → 1.
fn trailing_number(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}
