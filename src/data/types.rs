//! Type chart: per attacking type, the damage scalar against each defending type.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_TYPES_FILE: &str = "type.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDamage {
    /// Defending type id.
    pub id: String,
    #[serde(rename = "attackScalar")]
    pub scalar: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub damage: Vec<TypeDamage>,
}

/// Type entries indexed by id and by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct TypeChart {
    by_id: HashMap<String, TypeEntry>,
    name_to_id: HashMap<String, String>,
}

impl TypeChart {
    pub fn from_entries(entries: Vec<TypeEntry>) -> Self {
        let name_to_id = entries
            .iter()
            .map(|entry| (entry.name.to_lowercase(), entry.id.clone()))
            .collect();
        let by_id = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        Self { by_id, name_to_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Look a type up by display name, case-insensitively.
    pub fn by_name(&self, name: &str) -> Option<&TypeEntry> {
        let id = self.name_to_id.get(&name.trim().to_lowercase())?;
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Damage scalars when attacking with `id`, keyed by defending type name.
    pub fn attack_scalars(&self, id: &str) -> BTreeMap<String, f64> {
        let Some(entry) = self.by_id.get(id) else {
            return BTreeMap::new();
        };
        entry
            .damage
            .iter()
            .filter_map(|damage| {
                self.by_id
                    .get(&damage.id)
                    .map(|target| (target.name.clone(), damage.scalar))
            })
            .collect()
    }

    /// Damage scalars taken by `id`, keyed by attacking type name.
    pub fn defense_scalars(&self, id: &str) -> BTreeMap<String, f64> {
        if !self.by_id.contains_key(id) {
            return BTreeMap::new();
        }
        self.by_id
            .values()
            .flat_map(|attacker| {
                attacker
                    .damage
                    .iter()
                    .filter(move |damage| damage.id == id)
                    .map(move |damage| (attacker.name.clone(), damage.scalar))
            })
            .collect()
    }
}

pub fn load_type_chart(path: impl AsRef<Path>) -> Result<TypeChart, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries: Vec<TypeEntry> =
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(TypeChart::from_entries(entries))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_chart() -> TypeChart {
        let entry = |id: &str, name: &str, damage: &[(&str, f64)]| TypeEntry {
            id: id.to_string(),
            name: name.to_string(),
            damage: damage
                .iter()
                .map(|(target, scalar)| TypeDamage {
                    id: target.to_string(),
                    scalar: *scalar,
                })
                .collect(),
        };
        TypeChart::from_entries(vec![
            entry("WATER", "Water", &[("WATER", 0.625), ("FIRE", 1.6), ("GRASS", 0.625)]),
            entry("FIRE", "Fire", &[("WATER", 0.625), ("FIRE", 0.625), ("GRASS", 1.6)]),
            entry("GRASS", "Grass", &[("WATER", 1.6), ("FIRE", 0.625), ("GRASS", 0.625)]),
        ])
    }

    #[test]
    fn attack_scalars_use_target_names() {
        let chart = sample_chart();
        let scalars = chart.attack_scalars("WATER");
        assert_eq!(scalars.get("Fire"), Some(&1.6));
        assert_eq!(scalars.get("Grass"), Some(&0.625));
    }

    #[test]
    fn defense_scalars_collect_attackers() {
        let chart = sample_chart();
        let scalars = chart.defense_scalars("FIRE");
        assert_eq!(scalars.get("Water"), Some(&1.6));
        assert_eq!(scalars.get("Grass"), Some(&0.625));
        assert!(chart.defense_scalars("ROCK").is_empty());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let chart = sample_chart();
        assert_eq!(chart.by_name(" fIrE ").map(|t| t.id.as_str()), Some("FIRE"));
        assert!(chart.by_name("rock").is_none());
    }
}
