//! The eighteen pokemon type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DexError;

/// A pokemon type tag, used for secondary filtered pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl PokemonType {
    /// All type tags, in canonical dex order.
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fighting,
        PokemonType::Flying,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Rock,
        PokemonType::Bug,
        PokemonType::Ghost,
        PokemonType::Steel,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Grass,
        PokemonType::Electric,
        PokemonType::Psychic,
        PokemonType::Ice,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Fairy,
    ];

    /// The lowercase tag as used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fighting => "fighting",
            PokemonType::Flying => "flying",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Rock => "rock",
            PokemonType::Bug => "bug",
            PokemonType::Ghost => "ghost",
            PokemonType::Steel => "steel",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Grass => "grass",
            PokemonType::Electric => "electric",
            PokemonType::Psychic => "psychic",
            PokemonType::Ice => "ice",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Fairy => "fairy",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PokemonType {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PokemonType::ALL
            .iter()
            .find(|tag| tag.as_str() == s)
            .copied()
            .ok_or_else(|| DexError::UnknownType(s.to_string()))
    }
}
