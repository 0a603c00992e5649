use std::cmp::Ordering;

use serde::Serialize;

use crate::data::level::Level;
use crate::engine::cp::{CpKernel, Ivs};

/// Most candidates an IV query returns; anything beyond is cut and flagged.
pub const MAX_IV_RESULTS: usize = 50;
/// Rows per page of a raid chart.
pub const RAID_CHART_PAGE_SIZE: usize = 40;

/// Levels whose CP is used as a secondary sort key on every result set.
const TIE_BREAK_HIGH: f64 = 25.0;
const TIE_BREAK_LOW: f64 = 20.0;

/// One `(level, ivs)` combination consistent with an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IvCandidate {
    pub level: Level,
    #[serde(flatten)]
    pub ivs: Ivs,
    /// CP at `level`.
    pub cp: u32,
    pub percent: u8,
    pub cp_at_20: u32,
    pub cp_at_25: u32,
}

impl IvCandidate {
    /// Build a candidate, recomputing the tie-break CPs from the IVs.
    pub fn new(kernel: &CpKernel, level: Level, ivs: Ivs, cp: u32) -> Self {
        let (cp_at_20, cp_at_25) = tie_break_cps(kernel, ivs);
        Self {
            level,
            ivs,
            cp,
            percent: ivs.quality_percent(),
            cp_at_20,
            cp_at_25,
        }
    }
}

fn tie_break_cps(kernel: &CpKernel, ivs: Ivs) -> (u32, u32) {
    let at = |value: f64| {
        Level::new(value)
            .map(|level| kernel.cp_at_level(level, ivs))
            .unwrap_or_default()
    };
    (at(TIE_BREAK_LOW), at(TIE_BREAK_HIGH))
}

/// Descending on level, CP@25, CP@20, percent, then attack, defense, stamina.
pub fn compare(left: &IvCandidate, right: &IvCandidate) -> Ordering {
    right
        .level
        .cmp(&left.level)
        .then_with(|| right.cp_at_25.cmp(&left.cp_at_25))
        .then_with(|| right.cp_at_20.cmp(&left.cp_at_20))
        .then_with(|| right.percent.cmp(&left.percent))
        .then_with(|| right.ivs.attack.cmp(&left.ivs.attack))
        .then_with(|| right.ivs.defense.cmp(&left.ivs.defense))
        .then_with(|| right.ivs.stamina.cmp(&left.ivs.stamina))
}

/// Stable sort into presentation order.
pub fn rank(mut candidates: Vec<IvCandidate>) -> Vec<IvCandidate> {
    candidates.sort_by(compare);
    candidates
}

/// Keep the first `limit` candidates. The flag is true when anything was cut.
pub fn truncate(mut candidates: Vec<IvCandidate>, limit: usize) -> (Vec<IvCandidate>, bool) {
    let overflow = candidates.len() > limit;
    candidates.truncate(limit);
    (candidates, overflow)
}

/// Split ranked rows into pages of `page_size`.
pub fn paginate<T>(rows: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    rows.chunks(page_size).collect()
}
