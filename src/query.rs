//! Parsing of raw command arguments into engine queries.
//! Everything here runs before a solve; malformed input never reaches the solver.

use crate::data::level::{Level, MAX_LEVEL};
use crate::engine::cp::{Ivs, MAX_IV};
use crate::engine::filter::BestStats;
use crate::engine::solver::IvQuery;
use crate::error::QueryError;

const HP_PREFIX: &str = "hp=";

pub fn parse_u32(field: &'static str, raw: &str) -> Result<u32, QueryError> {
    raw.trim().parse::<u32>().map_err(|_| QueryError::NotAnInteger {
        field,
        value: raw.to_string(),
    })
}

pub fn parse_level(raw: &str) -> Result<Level, QueryError> {
    let value = raw.trim().parse::<f64>().map_err(|_| QueryError::NotANumber {
        field: "level",
        value: raw.to_string(),
    })?;
    Level::new(value).ok_or(QueryError::LevelOutOfRange(value))
}

pub fn parse_iv(raw: &str) -> Result<u8, QueryError> {
    let value = parse_u32("iv", raw)?;
    if value > u32::from(MAX_IV) {
        return Err(QueryError::IvOutOfRange(value));
    }
    Ok(value as u8)
}

pub fn parse_ivs(attack: &str, defense: &str, stamina: &str) -> Result<Ivs, QueryError> {
    Ok(Ivs {
        attack: parse_iv(attack)?,
        defense: parse_iv(defense)?,
        stamina: parse_iv(stamina)?,
    })
}

/// A value of at most 40 is a level; anything larger is a stardust cost.
/// Zero means the level is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelOrStardust {
    Unspecified,
    Level(Level),
    Stardust(u32),
}

pub fn parse_level_or_stardust(raw: &str) -> Result<LevelOrStardust, QueryError> {
    let value = raw.trim().parse::<f64>().map_err(|_| QueryError::NotANumber {
        field: "level or stardust",
        value: raw.to_string(),
    })?;
    if value == 0.0 {
        return Ok(LevelOrStardust::Unspecified);
    }
    if value <= MAX_LEVEL {
        return Level::new(value)
            .map(LevelOrStardust::Level)
            .ok_or(QueryError::LevelOutOfRange(value));
    }
    parse_u32("stardust", raw).map(LevelOrStardust::Stardust)
}

/// Parse `<cp> [level|stardust] [best] [hp=<n>]`.
pub fn parse_iv_query<S: AsRef<str>>(args: &[S]) -> Result<IvQuery, QueryError> {
    let mut hp = None;
    let mut positional = Vec::with_capacity(args.len());
    for arg in args {
        let arg = arg.as_ref();
        match arg.trim().to_ascii_lowercase().strip_prefix(HP_PREFIX) {
            Some(value) => hp = Some(parse_u32("hp", value)?),
            None => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let cp = parse_u32("cp", positional.next().ok_or(QueryError::Missing("cp"))?)?;
    let mut query = IvQuery::new(cp);
    query.hp = hp;

    if let Some(raw) = positional.next() {
        match parse_level_or_stardust(raw)? {
            LevelOrStardust::Unspecified => {}
            LevelOrStardust::Level(level) => query.level = Some(level),
            LevelOrStardust::Stardust(stardust) => query.stardust = Some(stardust),
        }
    }
    if let Some(raw) = positional.next() {
        query.best = BestStats::parse(raw)?;
    }
    Ok(query)
}
