//! Rotomdex — cached, paginated Pokédex client for the PokéAPI.
//!
//! This crate is the data layer of a pokédex: it lists, paginates,
//! filters and searches the remote collection while keeping a set of
//! bounded in-memory caches warm, so a UI on top of it can page back and
//! forth without re-fetching. The pieces compose bottom-up:
//!
//! - [`LruCache`] — fixed-capacity least-recently-used key/value cache.
//! - [`RetryConfig`]/[`with_retry`] — bounded exponential-backoff retry
//!   around any request-producing async operation.
//! - [`PokeApiClient`] — thin fetch wrapper over the consumed endpoints.
//! - [`Pokedex`] — the stateful service tying it all together: page
//!   loading with a bounded detail fan-out, background prefetch of the
//!   next page, type-filtered secondary pagination, and client-side
//!   search refinement.
//!
//! # Example
//!
//! ```rust,no_run
//! use rotomdex::Pokedex;
//!
//! #[tokio::main]
//! async fn main() -> rotomdex::Result<()> {
//!     let dex = Pokedex::new();
//!     dex.initialize().await?;
//!
//!     for pokemon in dex.visible_pokemon() {
//!         println!("#{:03} {}", pokemon.id, pokemon.name);
//!     }
//!
//!     dex.next_page().await?;
//!     Ok(())
//! }
//! ```
//!
//! Favorites persistence ([`FavoritesStore`]) and evolution chains
//! ([`EvolutionClient`]) are independent side components sharing the
//! same API client.

pub mod cache;
pub mod client;
pub mod dex;
pub mod error;
pub mod evolution;
pub mod favorites;
pub mod retry;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::LruCache;
pub use client::{DEFAULT_BASE_URL, PokeApiClient};
pub use dex::{PAGE_SIZE, Pokedex, PokedexBuilder, TypeIndex};
pub use error::{DexError, Result};
pub use evolution::{EvolutionChain, EvolutionClient, EvolutionStep, SpeciesInfo};
pub use favorites::{FavoritesStore, MAX_FAVORITES};
pub use retry::{RetryConfig, with_retry};
pub use types::validation::{
    MAX_POKEMON_ID, extract_pokemon_id_from_url, is_valid_pokemon_id, sanitize_search_input,
};
pub use types::{Ability, Pokemon, PokemonSummary, PokemonType, Sprites, Stat};
