//! "Best stat" appraisal filter.
//!
//! The filter names the set of stats that share the highest IV. A candidate
//! passes only when the stats attaining its maximum are exactly that set: with
//! filter `a`, attack must be strictly highest; with `ad`, attack and defense
//! must tie for highest with stamina below them.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::engine::cp::Ivs;
use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BestStats {
    pub attack: bool,
    pub defense: bool,
    pub stamina: bool,
}

impl BestStats {
    /// The set of stats that attain the maximum IV of `ivs`.
    pub fn of(ivs: Ivs) -> Self {
        let highest = ivs.attack.max(ivs.defense).max(ivs.stamina);
        Self {
            attack: ivs.attack == highest,
            defense: ivs.defense == highest,
            stamina: ivs.stamina == highest,
        }
    }

    /// Parse a filter code by letter membership: `a` attack, `d` defense,
    /// `s` or `h` stamina. Other characters are ignored, so `hp` and `attack`
    /// read naturally. An empty code means no filter; a code with no
    /// recognized letter is rejected.
    pub fn parse(code: &str) -> Result<Option<Self>, QueryError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        let lower = code.to_ascii_lowercase();
        let best = Self {
            attack: lower.contains('a'),
            defense: lower.contains('d'),
            stamina: lower.contains('s') || lower.contains('h'),
        };
        if best.is_empty() {
            return Err(QueryError::InvalidBestFilter(code.to_string()));
        }
        Ok(Some(best))
    }

    pub fn is_empty(&self) -> bool {
        !(self.attack || self.defense || self.stamina)
    }

    pub fn matches(&self, ivs: Ivs) -> bool {
        Self::of(ivs) == *self
    }

    pub fn code(&self) -> String {
        let mut code = String::with_capacity(3);
        if self.attack {
            code.push('a');
        }
        if self.defense {
            code.push('d');
        }
        if self.stamina {
            code.push('s');
        }
        code
    }
}

impl fmt::Display for BestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl Serialize for BestStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ivs(a: u8, d: u8, s: u8) -> Ivs {
        Ivs::new(a, d, s).expect("valid ivs")
    }

    #[test]
    fn attack_only_requires_strict_maximum() {
        let filter = BestStats::parse("a").unwrap().unwrap();
        assert!(filter.matches(ivs(15, 14, 3)));
        assert!(!filter.matches(ivs(15, 15, 3)), "tie with defense needs 'ad'");
        assert!(!filter.matches(ivs(10, 12, 3)));
        assert!(!filter.matches(ivs(9, 0, 9)));
    }

    #[test]
    fn tie_filter_requires_every_tied_stat() {
        let filter = BestStats::parse("ad").unwrap().unwrap();
        assert!(filter.matches(ivs(12, 12, 1)));
        assert!(!filter.matches(ivs(12, 12, 12)));
        assert!(!filter.matches(ivs(12, 11, 1)));
        let all = BestStats::parse("ads").unwrap().unwrap();
        assert!(all.matches(ivs(0, 0, 0)));
    }

    #[test]
    fn parse_accepts_hp_alias_in_any_order() {
        let parsed = BestStats::parse("HA").unwrap().unwrap();
        assert_eq!(parsed, BestStats::parse("as").unwrap().unwrap());
        assert_eq!(parsed.code(), "as");
        assert_eq!(BestStats::parse("").unwrap(), None);
    }

    #[test]
    fn parse_reads_whole_words_by_letter() {
        assert_eq!(BestStats::parse("hp").unwrap().map(|b| b.code()), Some("s".to_string()));
        assert_eq!(BestStats::parse("attack").unwrap().map(|b| b.code()), Some("a".to_string()));
        assert_eq!(BestStats::parse("def").unwrap().map(|b| b.code()), Some("d".to_string()));
        assert_eq!(BestStats::parse("ax").unwrap().map(|b| b.code()), Some("a".to_string()));
    }

    #[test]
    fn parse_rejects_codes_without_known_letters() {
        assert_eq!(
            BestStats::parse("xyz"),
            Err(QueryError::InvalidBestFilter("xyz".to_string()))
        );
    }
}
