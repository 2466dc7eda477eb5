//! Public types for the Rotomdex API.

pub mod api;
mod poke_type;
mod pokemon;
pub mod validation;

pub use poke_type::PokemonType;
pub use pokemon::{
    Ability, Pokemon, PokemonSummary, Sprites, Stat, capitalize, dex_number, format_height,
    format_weight,
};
