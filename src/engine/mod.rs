pub mod cp;
pub mod effect;
pub mod filter;
pub mod ranking;
pub mod raid;
pub mod solver;

use std::sync::Arc;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::data::catalog::Catalog;
use crate::data::creature::{MoveRef, StatBlock};
use crate::engine::cp::{cp_at, hp_at, max_cp, Ivs};
use crate::engine::effect::{EffectSummary, TypeRelations};
use crate::engine::raid::{raid_chart, raid_cp_range, raid_iv, CpRange, RaidChart, RaidIvSet, RaidTier};
use crate::engine::solver::{solve_iv, IvQuery, SolutionSet};
use crate::error::{EngineError, StartupError};
use crate::parallel::WorkerPool;

pub use cp::CpKernel;
pub use filter::BestStats;
pub use ranking::{IvCandidate, MAX_IV_RESULTS, RAID_CHART_PAGE_SIZE};

#[derive(Debug, Clone, Serialize)]
pub struct MoveList {
    pub creature: String,
    pub fast: Vec<String>,
    pub charge: Vec<String>,
}

fn display_names(moves: &[MoveRef]) -> Vec<String> {
    moves.iter().map(MoveRef::display_name).collect()
}

/// Query surface over a shared, read-only catalog. Cheap to clone; every
/// method is independent and safe to call from any number of threads.
#[derive(Debug, Clone)]
pub struct Calculator {
    catalog: Arc<Catalog>,
    raid_tier: RaidTier,
    pool: Arc<WorkerPool>,
}

impl Calculator {
    pub fn new(catalog: Arc<Catalog>, raid_tier: RaidTier) -> Self {
        Self {
            catalog,
            raid_tier,
            pool: Arc::new(WorkerPool::default()),
        }
    }

    /// Load the catalog and raid tier described by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, StartupError> {
        let raid_tier = config.raid_tier()?;
        let catalog = Catalog::load(&config.data_dir)?;
        Ok(Self {
            catalog,
            raid_tier,
            pool: Arc::new(WorkerPool::with_workers(config.workers)),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn raid_tier(&self) -> &RaidTier {
        &self.raid_tier
    }

    pub fn creature(&self, name: &str) -> Result<&StatBlock, EngineError> {
        self.catalog.creature(name)
    }

    /// CP at an explicit level and IV spread.
    pub fn cp(&self, name: &str, level: f64, ivs: Ivs) -> Result<u32, EngineError> {
        let creature = self.creature(name)?;
        let ivs = checked_ivs(ivs)?;
        cp_at(level, creature.stats, ivs).ok_or(EngineError::UnknownLevel(level))
    }

    /// HP at an explicit level and stamina IV.
    pub fn hp(&self, name: &str, level: f64, stamina_iv: u8) -> Result<u32, EngineError> {
        let creature = self.creature(name)?;
        let ivs = checked_ivs(Ivs::splat(stamina_iv))?;
        hp_at(level, creature.stats, ivs.stamina).ok_or(EngineError::UnknownLevel(level))
    }

    /// Perfect-IV CP at level 40; [EngineError::NoStats] for placeholder stats.
    pub fn max_cp(&self, name: &str) -> Result<u32, EngineError> {
        let creature = self.creature(name)?;
        max_cp(creature.stats).ok_or_else(|| EngineError::NoStats(creature.name.clone()))
    }

    pub fn iv(&self, name: &str, query: &IvQuery) -> Result<SolutionSet, EngineError> {
        let creature = self.creature(name)?;
        self.pool.install(|| solve_iv(creature, query))
    }

    pub fn raid_chart(&self, name: &str) -> Result<RaidChart, EngineError> {
        raid_chart(self.creature(name)?, &self.raid_tier)
    }

    pub fn raid_cp_range(&self, name: &str) -> Result<Vec<CpRange>, EngineError> {
        raid_cp_range(self.creature(name)?, &self.raid_tier)
    }

    pub fn raid_iv(&self, name: &str, cp: u32) -> Result<RaidIvSet, EngineError> {
        raid_iv(self.creature(name)?, &self.raid_tier, cp)
    }

    pub fn types(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let creature = self.creature(name)?;
        Ok(creature.type_names().into_iter().map(str::to_string).collect())
    }

    pub fn moves(&self, name: &str) -> Result<MoveList, EngineError> {
        let creature = self.creature(name)?;
        Ok(MoveList {
            creature: creature.name.clone(),
            fast: display_names(&creature.quick_moves),
            charge: display_names(&creature.cinematic_moves),
        })
    }

    /// Effect summary for a creature name, or failing that, a type name.
    pub fn effect(&self, name: &str) -> Result<EffectSummary, EngineError> {
        let chart = self.catalog.types();
        if let Some(creature) = self.catalog.find(name) {
            let relations = TypeRelations::for_creature(chart, creature);
            let types = creature.type_names().into_iter().map(str::to_string).collect();
            return Ok(EffectSummary::new(creature.name.clone(), types, &relations));
        }
        let entry = chart
            .by_name(name)
            .ok_or_else(|| EngineError::UnknownType(name.trim().to_string()))?;
        let relations = TypeRelations::for_type(chart, entry);
        Ok(EffectSummary::new(entry.name.clone(), vec![entry.name.clone()], &relations))
    }
}

fn checked_ivs(ivs: Ivs) -> Result<Ivs, EngineError> {
    for (stat, value) in [
        ("attack", ivs.attack),
        ("defense", ivs.defense),
        ("stamina", ivs.stamina),
    ] {
        if value > cp::MAX_IV {
            return Err(EngineError::InvalidIv {
                stat,
                value: u32::from(value),
            });
        }
    }
    Ok(ivs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::creature::BaseStats;
    use crate::data::types::TypeChart;

    fn calculator() -> Calculator {
        let catalog = Catalog::from_parts(
            vec![
                StatBlock::new("Mewtwo", BaseStats::new(300, 182, 214)),
                StatBlock::new("Meltan", BaseStats::new(1, 1, 1)),
            ],
            TypeChart::default(),
        )
        .expect("catalog should build");
        Calculator::new(Arc::new(catalog), RaidTier::default())
    }

    #[test]
    fn max_cp_distinguishes_unknown_and_placeholder() {
        let calc = calculator();
        assert_eq!(calc.max_cp("mewtwo"), Ok(4178));
        assert_eq!(calc.max_cp("meltan"), Err(EngineError::NoStats("Meltan".to_string())));
        assert_eq!(
            calc.max_cp("missingno"),
            Err(EngineError::UnknownCreature("missingno".to_string()))
        );
    }

    #[test]
    fn cp_validates_level_and_ivs() {
        let calc = calculator();
        assert_eq!(calc.cp("mewtwo", 20.0, Ivs::PERFECT), Ok(2387));
        assert_eq!(calc.cp("mewtwo", 45.0, Ivs::PERFECT), Err(EngineError::UnknownLevel(45.0)));
        let bad = Ivs {
            attack: 15,
            defense: 16,
            stamina: 0,
        };
        assert_eq!(
            calc.cp("mewtwo", 20.0, bad),
            Err(EngineError::InvalidIv {
                stat: "defense",
                value: 16
            })
        );
    }

    #[test]
    fn iv_query_runs_through_pool() {
        let calc = calculator();
        let result = calc.iv("Mewtwo", &IvQuery::new(2387)).expect("mewtwo has stats");
        assert!(result.truncated);
        assert_eq!(result.candidates.len(), MAX_IV_RESULTS);
    }

    #[test]
    fn effect_without_types_is_unknown_type() {
        let calc = calculator();
        assert_eq!(
            calc.effect("fire").unwrap_err(),
            EngineError::UnknownType("fire".to_string())
        );
    }
}
