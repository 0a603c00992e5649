//! Startup-loaded stat catalog.
//! Load once at startup, share via Arc with every query; nothing mutates it afterwards.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::data::creature::{load_creatures, StatBlock, DEFAULT_CREATURES_FILE};
use crate::data::level::multiplier_table;
use crate::data::registry::{load_registry, Registry};
use crate::data::types::{load_type_chart, TypeChart, DEFAULT_TYPES_FILE};
use crate::error::{CatalogError, EngineError};

/// Normalize a creature name for lookup: trimmed, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only registry of creatures and types.
#[derive(Debug, Default)]
pub struct Catalog {
    creatures: Vec<StatBlock>,
    by_name: HashMap<String, usize>,
    types: TypeChart,
    registry: Option<Registry>,
}

impl Catalog {
    /// Load `pokemon.json` and `type.json` from `data_dir`. A missing creature
    /// file is an error; a missing type file only disables type lookups. A
    /// type file that exists but does not parse is an error.
    pub fn load(data_dir: &Path) -> Result<Arc<Catalog>, CatalogError> {
        check_multiplier_table()?;

        let creatures = load_creatures(data_dir.join(DEFAULT_CREATURES_FILE))?;
        let types = match load_type_chart(data_dir.join(DEFAULT_TYPES_FILE)) {
            Ok(types) => types,
            Err(CatalogError::Io { path, source }) if source.kind() == ErrorKind::NotFound => {
                warn!(path = %path, "type chart missing, type lookups disabled");
                TypeChart::default()
            }
            Err(err) => return Err(err),
        };

        let mut catalog = Catalog::from_parts(creatures, types)?;
        catalog.registry = load_registry(data_dir);
        info!(
            creatures = catalog.creatures.len(),
            types = catalog.types.len(),
            data_dir = %data_dir.display(),
            "stat catalog loaded"
        );
        Ok(Arc::new(catalog))
    }

    /// Build a catalog from already-parsed parts. Rejects duplicate names.
    pub fn from_parts(creatures: Vec<StatBlock>, types: TypeChart) -> Result<Catalog, CatalogError> {
        let mut by_name = HashMap::with_capacity(creatures.len());
        for (index, creature) in creatures.iter().enumerate() {
            let key = normalize_name(&creature.name);
            if by_name.insert(key, index).is_some() {
                return Err(CatalogError::DuplicateCreature(creature.name.clone()));
            }
        }
        Ok(Catalog {
            creatures,
            by_name,
            types,
            registry: None,
        })
    }

    /// All creatures in dataset order.
    pub fn creatures(&self) -> &[StatBlock] {
        &self.creatures
    }

    pub fn find(&self, name: &str) -> Option<&StatBlock> {
        self.by_name
            .get(&normalize_name(name))
            .map(|index| &self.creatures[*index])
    }

    /// Resolve a creature by name, surfacing the name as typed when unknown.
    pub fn creature(&self, name: &str) -> Result<&StatBlock, EngineError> {
        self.find(name)
            .ok_or_else(|| EngineError::UnknownCreature(name.trim().to_string()))
    }

    pub fn types(&self) -> &TypeChart {
        &self.types
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }
}

fn check_multiplier_table() -> Result<(), CatalogError> {
    let mut previous: Option<f64> = None;
    for (level, multiplier) in multiplier_table() {
        if previous.is_some_and(|prev| prev >= multiplier) {
            return Err(CatalogError::MultiplierOrder(level));
        }
        previous = Some(multiplier);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::data::creature::BaseStats;

    fn scratch_dir(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("ivcalc-{name}-{stamp}"));
        fs::create_dir_all(&dir).expect("scratch dir should be created");
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        fs::copy(bundled.join(DEFAULT_CREATURES_FILE), dir.join(DEFAULT_CREATURES_FILE))
            .expect("creature file should copy");
        dir
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let catalog = Catalog::from_parts(
            vec![StatBlock::new("Mewtwo", BaseStats::new(300, 182, 214))],
            TypeChart::default(),
        )
        .expect("catalog should build");
        assert!(catalog.find("  MEWTWO ").is_some());
        assert_eq!(
            catalog.creature("mew").unwrap_err(),
            EngineError::UnknownCreature("mew".to_string())
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Catalog::from_parts(
            vec![
                StatBlock::new("Pikachu", BaseStats::new(112, 96, 70)),
                StatBlock::new("pikachu", BaseStats::new(112, 96, 70)),
            ],
            TypeChart::default(),
        );
        assert!(matches!(result, Err(CatalogError::DuplicateCreature(name)) if name == "pikachu"));
    }

    #[test]
    fn bundled_dataset_loads() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let catalog = Catalog::load(&data_dir).expect("bundled data should load");
        assert!(catalog.find("mewtwo").is_some());
        assert_eq!(catalog.types().len(), 18);
        assert!(catalog.registry().is_some());
    }

    #[test]
    fn missing_type_file_disables_type_lookups() {
        let dir = scratch_dir("no-types");
        let catalog = Catalog::load(&dir).expect("missing type file is tolerated");
        assert!(catalog.types().is_empty());
        assert!(catalog.find("mewtwo").is_some());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_type_file_is_fatal() {
        let dir = scratch_dir("bad-types");
        fs::write(dir.join(DEFAULT_TYPES_FILE), "{ not json").expect("type file should write");
        let result = Catalog::load(&dir);
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bundled_multiplier_table_is_ordered() {
        assert!(check_multiplier_table().is_ok());
    }
}
