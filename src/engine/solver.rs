//! Exhaustive IV search.
//!
//! For every candidate level and every `(attack, defense, stamina)` in
//! `0..=15`, compute the CP and keep the combinations equal to the observed
//! value. The candidate level set comes from an explicit level, a stardust
//! band, or the whole table.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::data::creature::{BaseStats, StatBlock};
use crate::data::level::Level;
use crate::data::stardust::levels_for_stardust;
use crate::engine::cp::{compute_hp, CpKernel, Ivs, MAX_IV};
use crate::engine::filter::BestStats;
use crate::engine::ranking::{rank, truncate, IvCandidate, MAX_IV_RESULTS};
use crate::error::EngineError;

/// Level sets larger than this are scanned on the rayon pool.
const PARALLEL_LEVEL_THRESHOLD: usize = 4;

/// What the caller observed about one creature.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IvQuery {
    pub cp: u32,
    /// Observed HP, used only to narrow CP matches.
    pub hp: Option<u32>,
    pub level: Option<Level>,
    pub stardust: Option<u32>,
    pub best: Option<BestStats>,
}

impl IvQuery {
    pub fn new(cp: u32) -> Self {
        Self {
            cp,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_stardust(mut self, stardust: u32) -> Self {
        self.stardust = Some(stardust);
        self
    }

    pub fn with_best(mut self, best: BestStats) -> Self {
        self.best = Some(best);
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    /// Levels to search: the explicit level, else the stardust band, else
    /// every level in the table (also when the stardust cost is unknown).
    pub fn candidate_levels(&self) -> Vec<Level> {
        if let Some(level) = self.level {
            return vec![level];
        }
        if let Some(levels) = self.stardust.and_then(levels_for_stardust) {
            return levels;
        }
        Level::all().collect()
    }
}

/// Ranked, possibly truncated answer to an [IvQuery].
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSet {
    pub creature: String,
    pub cp: u32,
    pub candidates: Vec<IvCandidate>,
    /// Matches found before truncation.
    pub total_matches: usize,
    /// True when more than [MAX_IV_RESULTS] matched and the tail was dropped.
    pub truncated: bool,
}

impl SolutionSet {
    /// No combination produced the observed CP.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Every combination matching the query, unranked, in level order.
pub fn enumerate_matches(stats: BaseStats, query: &IvQuery) -> Vec<IvCandidate> {
    let levels = query.candidate_levels();
    let kernel = CpKernel::new(stats);
    let scan = |level: &Level| scan_level(&kernel, *level, query);

    let per_level: Vec<Vec<IvCandidate>> = if levels.len() > PARALLEL_LEVEL_THRESHOLD {
        levels.par_iter().map(scan).collect()
    } else {
        levels.iter().map(scan).collect()
    };
    per_level.into_iter().flatten().collect()
}

fn scan_level(kernel: &CpKernel, level: Level, query: &IvQuery) -> Vec<IvCandidate> {
    let multiplier = level.multiplier();
    let multiplier_sq = multiplier * multiplier;
    let mut matches = Vec::new();

    for attack in (0..=MAX_IV).rev() {
        for defense in (0..=MAX_IV).rev() {
            for stamina in (0..=MAX_IV).rev() {
                let ivs = Ivs {
                    attack,
                    defense,
                    stamina,
                };
                if query.best.is_some_and(|best| !best.matches(ivs)) {
                    continue;
                }
                let cp = kernel.cp(multiplier_sq, ivs);
                if cp != query.cp {
                    continue;
                }
                if query
                    .hp
                    .is_some_and(|hp| compute_hp(kernel.stats(), level, stamina) != hp)
                {
                    continue;
                }
                matches.push(IvCandidate::new(kernel, level, ivs, cp));
            }
        }
    }
    matches
}

/// Solve, rank and truncate for one creature.
pub fn solve_iv(creature: &StatBlock, query: &IvQuery) -> Result<SolutionSet, EngineError> {
    let stats = creature
        .known_stats()
        .ok_or_else(|| EngineError::NoStats(creature.name.clone()))?;

    let matches = enumerate_matches(stats, query);
    let total_matches = matches.len();
    let (candidates, truncated) = truncate(rank(matches), MAX_IV_RESULTS);

    debug!(
        creature = %creature.name,
        cp = query.cp,
        levels = query.candidate_levels().len(),
        total_matches,
        truncated,
        "iv search finished"
    );

    Ok(SolutionSet {
        creature: creature.name.clone(),
        cp: query.cp,
        candidates,
        total_matches,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::compute_cp;

    fn mewtwo() -> StatBlock {
        StatBlock::new("Mewtwo", BaseStats::new(300, 182, 214))
    }

    fn level(value: f64) -> Level {
        Level::new(value).expect("level in table")
    }

    #[test]
    fn explicit_level_round_trip() {
        let creature = mewtwo();
        let cp = compute_cp(creature.stats, level(25.0), Ivs::PERFECT);
        let result = solve_iv(&creature, &IvQuery::new(cp).with_level(level(25.0)))
            .expect("mewtwo has stats");
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].ivs, Ivs::PERFECT);
        assert_eq!(result.candidates[0].level, level(25.0));
        assert!(!result.truncated);
    }

    #[test]
    fn full_range_search_truncates_to_fifty() {
        let result = solve_iv(&mewtwo(), &IvQuery::new(2387)).expect("mewtwo has stats");
        assert_eq!(result.total_matches, 70);
        assert_eq!(result.candidates.len(), MAX_IV_RESULTS);
        assert!(result.truncated);
        assert_eq!(result.candidates[0].level, level(22.0));
        assert_eq!(result.candidates[0].ivs, Ivs { attack: 0, defense: 4, stamina: 7 });
    }

    #[test]
    fn stardust_band_narrows_levels() {
        let query = IvQuery::new(2387).with_stardust(2500);
        let levels: Vec<f64> = query.candidate_levels().into_iter().map(Level::value).collect();
        assert_eq!(levels, vec![19.0, 19.5, 20.0, 20.5]);
        let result = solve_iv(&mewtwo(), &query).expect("mewtwo has stats");
        assert_eq!(result.total_matches, 10);
        assert!(!result.truncated);
    }

    #[test]
    fn top_stardust_band_never_reaches_level_40() {
        let creature = mewtwo();
        let at_cap = compute_cp(creature.stats, level(40.0), Ivs::PERFECT);
        let result = solve_iv(&creature, &IvQuery::new(at_cap).with_stardust(10000))
            .expect("mewtwo has stats");
        assert!(result.is_empty());

        let below_cap = compute_cp(creature.stats, level(39.5), Ivs::PERFECT);
        let result = solve_iv(&creature, &IvQuery::new(below_cap).with_stardust(10000))
            .expect("mewtwo has stats");
        assert!(!result.is_empty());
        assert!(result.candidates.iter().all(|c| c.level < level(40.0)));
    }

    #[test]
    fn unknown_stardust_searches_every_level() {
        let query = IvQuery::new(2387).with_stardust(2400);
        assert_eq!(query.candidate_levels().len(), crate::data::level::LEVEL_COUNT);
    }

    #[test]
    fn best_filter_narrows_matches() {
        let best = BestStats::parse("a").unwrap().unwrap();
        let result = solve_iv(&mewtwo(), &IvQuery::new(2387).with_best(best)).expect("stats");
        assert_eq!(result.total_matches, 20);
        for candidate in &result.candidates {
            assert!(candidate.ivs.attack > candidate.ivs.defense);
            assert!(candidate.ivs.attack > candidate.ivs.stamina);
        }

        let tied = BestStats::parse("da").unwrap().unwrap();
        let result = solve_iv(&mewtwo(), &IvQuery::new(2387).with_best(tied)).expect("stats");
        assert_eq!(result.total_matches, 4);
        assert!(result
            .candidates
            .iter()
            .all(|c| c.ivs.attack == c.ivs.defense && c.ivs.stamina < c.ivs.attack));
    }

    #[test]
    fn hp_narrows_but_keeps_cp_check() {
        let result =
            solve_iv(&mewtwo(), &IvQuery::new(2387).with_hp(136)).expect("mewtwo has stats");
        assert_eq!(result.total_matches, 11);
        assert!(result.candidates.iter().any(|c| c.ivs == Ivs::PERFECT));
        assert!(result.candidates.iter().all(|c| c.cp == 2387));
    }

    #[test]
    fn impossible_cp_is_empty_not_error() {
        let result = solve_iv(&mewtwo(), &IvQuery::new(9)).expect("mewtwo has stats");
        assert!(result.is_empty());
        assert_eq!(result.creature, "Mewtwo");
        assert!(!result.truncated);
    }

    #[test]
    fn placeholder_creature_has_no_stats() {
        let meltan = StatBlock::new("Meltan", BaseStats::new(1, 1, 1));
        assert_eq!(
            solve_iv(&meltan, &IvQuery::new(10)).unwrap_err(),
            EngineError::NoStats("Meltan".to_string())
        );
    }

    #[test]
    fn parallel_and_sequential_scans_agree() {
        let stats = BaseStats::new(180, 168, 190);
        let query = IvQuery::new(1680);
        let parallel = rank(enumerate_matches(stats, &query));
        let sequential: Vec<IvCandidate> = rank(
            Level::all()
                .flat_map(|lvl| enumerate_matches(stats, &query.with_level(lvl)))
                .collect(),
        );
        assert_eq!(parallel, sequential);
        assert!(parallel
            .iter()
            .any(|c| c.level == level(25.0) && c.ivs == Ivs { attack: 15, defense: 14, stamina: 15 }));
    }
}
