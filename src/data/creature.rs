//! Creature stat blocks as shipped in `data/pokemon.json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_CREATURES_FILE: &str = "pokemon.json";

/// Base stats of exactly `1/1/1` mean the dataset has no real numbers yet.
const SENTINEL_STAT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_stamina: u32,
}

impl BaseStats {
    pub const fn new(base_attack: u32, base_defense: u32, base_stamina: u32) -> Self {
        Self {
            base_attack,
            base_defense,
            base_stamina,
        }
    }

    /// True for the `1/1/1` placeholder used for unreleased creatures.
    pub fn is_placeholder(&self) -> bool {
        self.base_attack == SENTINEL_STAT
            && self.base_defense == SENTINEL_STAT
            && self.base_stamina == SENTINEL_STAT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRef {
    pub id: String,
    pub name: String,
}

impl MoveRef {
    /// Move name without the trailing "Fast" marker used for quick moves.
    pub fn display_name(&self) -> String {
        self.name.replacen("Fast", "", 1).trim().to_string()
    }
}

/// One creature: identity, base stats, types and moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub dex: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeRef>,
    pub stats: BaseStats,
    #[serde(default)]
    pub quick_moves: Vec<MoveRef>,
    #[serde(default)]
    pub cinematic_moves: Vec<MoveRef>,
    /// Max CP as published by the dataset; informational only, the engine
    /// recomputes it.
    #[serde(default, rename = "maxCP")]
    pub max_cp: Option<u32>,
}

impl StatBlock {
    pub fn new(name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            id: None,
            dex: None,
            types: Vec::new(),
            stats,
            quick_moves: Vec::new(),
            cinematic_moves: Vec::new(),
            max_cp: None,
        }
    }

    pub fn with_types(mut self, types: Vec<TypeRef>) -> Self {
        self.types = types;
        self
    }

    /// `Some` when the creature has real stat data.
    pub fn known_stats(&self) -> Option<BaseStats> {
        (!self.stats.is_placeholder()).then_some(self.stats)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Load the creature list from a JSON array file.
pub fn load_creatures(path: impl AsRef<Path>) -> Result<Vec<StatBlock>, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_creatures(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_creatures(raw: &str) -> Result<Vec<StatBlock>, serde_json::Error> {
    serde_json::from_str(raw)
}
