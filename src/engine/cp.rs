//! Combat Power and HP formulas.
//!
//! `cp = floor(atk * sqrt(def) * sqrt(sta) * m^2 / 10)`, clamped to a floor of
//! 10, where each stat is `base + iv` and `m` is the level's CP multiplier.
//! Observed CPs are matched with exact integer equality, so the operation order
//! below is fixed and shared by every caller.

use serde::{Deserialize, Serialize};

use crate::data::creature::BaseStats;
use crate::data::level::Level;

/// Lowest CP and HP the game ever reports.
pub const CP_FLOOR: u32 = 10;
pub const HP_FLOOR: u32 = 10;

pub const MAX_IV: u8 = 15;
/// Sum of three perfect IVs.
pub const MAX_IV_SUM: u32 = 45;

/// Attack/defense/stamina individual values, each in `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ivs {
    pub attack: u8,
    pub defense: u8,
    pub stamina: u8,
}

impl Ivs {
    pub const PERFECT: Ivs = Ivs {
        attack: MAX_IV,
        defense: MAX_IV,
        stamina: MAX_IV,
    };

    /// `None` if any value exceeds 15.
    pub fn new(attack: u8, defense: u8, stamina: u8) -> Option<Self> {
        (attack <= MAX_IV && defense <= MAX_IV && stamina <= MAX_IV).then_some(Self {
            attack,
            defense,
            stamina,
        })
    }

    pub const fn splat(value: u8) -> Self {
        Self {
            attack: value,
            defense: value,
            stamina: value,
        }
    }

    pub fn sum(&self) -> u32 {
        u32::from(self.attack) + u32::from(self.defense) + u32::from(self.stamina)
    }

    pub fn quality_percent(&self) -> u8 {
        quality_percent(self.sum())
    }
}

/// `round(100 * sum / 45)`, halves rounded away from zero.
pub fn quality_percent(iv_sum: u32) -> u8 {
    (f64::from(iv_sum * 100) / f64::from(MAX_IV_SUM)).round() as u8
}

/// Shared core of the formula. Callers pass pre-rooted defense/stamina and the
/// squared multiplier so cached values produce bit-identical results.
#[inline]
fn cp_from_parts(attack: f64, defense_root: f64, stamina_root: f64, multiplier_sq: f64) -> u32 {
    let cp = (attack * defense_root * stamina_root * multiplier_sq / 10.0) as u32;
    cp.max(CP_FLOOR)
}

/// CP for a creature at a table level.
pub fn compute_cp(stats: BaseStats, level: Level, ivs: Ivs) -> u32 {
    let attack = f64::from(stats.base_attack + u32::from(ivs.attack));
    let defense = f64::from(stats.base_defense + u32::from(ivs.defense));
    let stamina = f64::from(stats.base_stamina + u32::from(ivs.stamina));
    let multiplier = level.multiplier();
    cp_from_parts(attack, defense.sqrt(), stamina.sqrt(), multiplier * multiplier)
}

/// CP for a raw level value. `None` when the level is not in the multiplier table.
pub fn cp_at(level: f64, stats: BaseStats, ivs: Ivs) -> Option<u32> {
    Level::new(level).map(|level| compute_cp(stats, level, ivs))
}

/// HP at a level: `floor((base stamina + stamina iv) * m)`, floored at 10.
pub fn compute_hp(stats: BaseStats, level: Level, stamina_iv: u8) -> u32 {
    let stamina = f64::from(stats.base_stamina + u32::from(stamina_iv));
    ((stamina * level.multiplier()) as u32).max(HP_FLOOR)
}

/// HP for a raw level value. `None` when the level is not in the multiplier table.
pub fn hp_at(level: f64, stats: BaseStats, stamina_iv: u8) -> Option<u32> {
    Level::new(level).map(|level| compute_hp(stats, level, stamina_iv))
}

/// Perfect-IV CP at the level cap. `None` for placeholder `1/1/1` stats.
pub fn max_cp(stats: BaseStats) -> Option<u32> {
    if stats.is_placeholder() {
        return None;
    }
    Level::new(crate::data::level::MAX_LEVEL).map(|cap| compute_cp(stats, cap, Ivs::PERFECT))
}

/// Per-creature scratch tables for repeated CP evaluation: effective attack and
/// rooted defense/stamina for every IV value. Built once per query.
#[derive(Debug, Clone)]
pub struct CpKernel {
    stats: BaseStats,
    attack: [f64; 16],
    defense_root: [f64; 16],
    stamina_root: [f64; 16],
}

impl CpKernel {
    pub fn new(stats: BaseStats) -> Self {
        let mut attack = [0.0; 16];
        let mut defense_root = [0.0; 16];
        let mut stamina_root = [0.0; 16];
        for iv in 0..16u32 {
            let i = iv as usize;
            attack[i] = f64::from(stats.base_attack + iv);
            defense_root[i] = f64::from(stats.base_defense + iv).sqrt();
            stamina_root[i] = f64::from(stats.base_stamina + iv).sqrt();
        }
        Self {
            stats,
            attack,
            defense_root,
            stamina_root,
        }
    }

    pub fn stats(&self) -> BaseStats {
        self.stats
    }

    /// Same result as [compute_cp] for `multiplier_sq = m * m` of the level.
    #[inline]
    pub fn cp(&self, multiplier_sq: f64, ivs: Ivs) -> u32 {
        cp_from_parts(
            self.attack[ivs.attack as usize],
            self.defense_root[ivs.defense as usize],
            self.stamina_root[ivs.stamina as usize],
            multiplier_sq,
        )
    }

    pub fn cp_at_level(&self, level: Level, ivs: Ivs) -> u32 {
        let multiplier = level.multiplier();
        self.cp(multiplier * multiplier, ivs)
    }
}
