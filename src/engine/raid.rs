//! Raid-tier CP lookups.
//!
//! Raid rewards always have IVs of at least 10 and are evaluated at a fixed
//! set of canonical levels. The level set is configuration (see
//! [crate::config::EngineConfig::raid_levels]); the default is 20 and 25.

use serde::Serialize;

use crate::data::creature::{BaseStats, StatBlock};
use crate::data::level::Level;
use crate::engine::cp::{CpKernel, Ivs, MAX_IV};
use crate::engine::ranking::{paginate, rank, IvCandidate, RAID_CHART_PAGE_SIZE};
use crate::error::{ConfigError, EngineError};

/// Lowest IV a raid reward can roll.
pub const RAID_IV_FLOOR: u8 = 10;
/// Rows below this quality are left out of the summary chart.
pub const RAID_CHART_MIN_PERCENT: u8 = 90;

pub const DEFAULT_RAID_LEVELS: [f64; 2] = [20.0, 25.0];

/// Canonical raid levels, ascending and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaidTier {
    levels: Vec<Level>,
}

impl RaidTier {
    pub fn new(values: &[f64]) -> Result<Self, ConfigError> {
        let mut levels = values
            .iter()
            .map(|value| Level::new(*value).ok_or(ConfigError::InvalidRaidLevel(*value)))
            .collect::<Result<Vec<_>, _>>()?;
        levels.sort();
        levels.dedup();
        if levels.is_empty() {
            return Err(ConfigError::EmptyRaidLevels);
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Highest canonical level. A tier always holds at least one level.
    pub fn top(&self) -> Level {
        self.levels[self.levels.len() - 1]
    }
}

impl Default for RaidTier {
    fn default() -> Self {
        Self {
            levels: DEFAULT_RAID_LEVELS
                .iter()
                .filter_map(|value| Level::new(*value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCp {
    pub level: Level,
    pub cp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaidChartRow {
    #[serde(flatten)]
    pub ivs: Ivs,
    pub percent: u8,
    /// CP at each canonical level, in tier order.
    pub cps: Vec<LevelCp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaidChart {
    pub creature: String,
    pub levels: Vec<Level>,
    pub rows: Vec<RaidChartRow>,
}

impl RaidChart {
    pub fn pages(&self) -> Vec<&[RaidChartRow]> {
        paginate(&self.rows, RAID_CHART_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpRange {
    pub level: Level,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaidIvSet {
    pub creature: String,
    pub cp: u32,
    pub candidates: Vec<IvCandidate>,
}

impl RaidIvSet {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn raid_ivs() -> impl Iterator<Item = Ivs> {
    (RAID_IV_FLOOR..=MAX_IV).rev().flat_map(|attack| {
        (RAID_IV_FLOOR..=MAX_IV).rev().flat_map(move |defense| {
            (RAID_IV_FLOOR..=MAX_IV).rev().map(move |stamina| Ivs {
                attack,
                defense,
                stamina,
            })
        })
    })
}

fn raid_stats(creature: &StatBlock) -> Result<BaseStats, EngineError> {
    creature
        .known_stats()
        .ok_or_else(|| EngineError::NoStats(creature.name.clone()))
}

/// Every raid IV combination of at least 90%, ranked, with CP per canonical level.
pub fn raid_chart(creature: &StatBlock, tier: &RaidTier) -> Result<RaidChart, EngineError> {
    let stats = raid_stats(creature)?;
    let kernel = CpKernel::new(stats);
    // Ranking needs one level per row; every row shares the top tier level.
    let top = tier.top();

    let candidates: Vec<IvCandidate> = raid_ivs()
        .filter(|ivs| ivs.quality_percent() >= RAID_CHART_MIN_PERCENT)
        .map(|ivs| IvCandidate::new(&kernel, top, ivs, kernel.cp_at_level(top, ivs)))
        .collect();

    let rows = rank(candidates)
        .into_iter()
        .map(|candidate| RaidChartRow {
            ivs: candidate.ivs,
            percent: candidate.percent,
            cps: tier
                .levels()
                .iter()
                .map(|level| LevelCp {
                    level: *level,
                    cp: kernel.cp_at_level(*level, candidate.ivs),
                })
                .collect(),
        })
        .collect();

    Ok(RaidChart {
        creature: creature.name.clone(),
        levels: tier.levels().to_vec(),
        rows,
    })
}

/// Min (10/10/10) and max (15/15/15) CP at each canonical level.
pub fn raid_cp_range(creature: &StatBlock, tier: &RaidTier) -> Result<Vec<CpRange>, EngineError> {
    let stats = raid_stats(creature)?;
    let kernel = CpKernel::new(stats);
    Ok(tier
        .levels()
        .iter()
        .map(|level| CpRange {
            level: *level,
            min: kernel.cp_at_level(*level, Ivs::splat(RAID_IV_FLOOR)),
            max: kernel.cp_at_level(*level, Ivs::PERFECT),
        })
        .collect())
}

/// Raid IV combinations whose CP at any canonical level equals `target_cp`.
/// A combination matching at two levels yields one row per level.
pub fn raid_iv(
    creature: &StatBlock,
    tier: &RaidTier,
    target_cp: u32,
) -> Result<RaidIvSet, EngineError> {
    let stats = raid_stats(creature)?;
    let kernel = CpKernel::new(stats);

    let mut candidates = Vec::new();
    for ivs in raid_ivs() {
        for level in tier.levels() {
            let cp = kernel.cp_at_level(*level, ivs);
            if cp == target_cp {
                candidates.push(IvCandidate::new(&kernel, *level, ivs, cp));
            }
        }
    }

    Ok(RaidIvSet {
        creature: creature.name.clone(),
        cp: target_cp,
        candidates: rank(candidates),
    })
}
