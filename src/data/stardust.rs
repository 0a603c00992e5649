//! Stardust power-up cost bands. A known stardust cost narrows the level search
//! to the handful of half levels that cost that much to power up.

use crate::data::level::Level;

const BAND_WIDTH: usize = 4;

/// `(stardust cost, first level, half levels in the band)`. Powering up from
/// level 40 costs nothing, so the last band holds only 39.0 and 39.5.
const STARDUST_BANDS: &[(u32, f64, usize)] = &[
    (200, 1.0, BAND_WIDTH),
    (400, 3.0, BAND_WIDTH),
    (600, 5.0, BAND_WIDTH),
    (800, 7.0, BAND_WIDTH),
    (1000, 9.0, BAND_WIDTH),
    (1300, 11.0, BAND_WIDTH),
    (1600, 13.0, BAND_WIDTH),
    (1900, 15.0, BAND_WIDTH),
    (2200, 17.0, BAND_WIDTH),
    (2500, 19.0, BAND_WIDTH),
    (3000, 21.0, BAND_WIDTH),
    (3500, 23.0, BAND_WIDTH),
    (4000, 25.0, BAND_WIDTH),
    (4500, 27.0, BAND_WIDTH),
    (5000, 29.0, BAND_WIDTH),
    (6000, 31.0, BAND_WIDTH),
    (7000, 33.0, BAND_WIDTH),
    (8000, 35.0, BAND_WIDTH),
    (9000, 37.0, BAND_WIDTH),
    (10000, 39.0, 2),
];

/// Levels reachable at the given stardust cost, or `None` if the cost is not a
/// known band.
pub fn levels_for_stardust(stardust: u32) -> Option<Vec<Level>> {
    let (_, first, width) = STARDUST_BANDS
        .iter()
        .find(|(cost, _, _)| *cost == stardust)?;
    let start = Level::new(*first)?.index();
    Some(
        (start..start + width)
            .filter_map(Level::from_index)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(levels: Vec<Level>) -> Vec<f64> {
        levels.into_iter().map(Level::value).collect()
    }

    #[test]
    fn regular_band_has_four_half_levels() {
        let levels = levels_for_stardust(2500).map(values);
        assert_eq!(levels, Some(vec![19.0, 19.5, 20.0, 20.5]));
    }

    #[test]
    fn capped_band_collapses_to_two() {
        let levels = levels_for_stardust(10000).map(values);
        assert_eq!(levels, Some(vec![39.0, 39.5]));
    }

    #[test]
    fn unknown_cost_has_no_band() {
        assert!(levels_for_stardust(2400).is_none());
        assert!(levels_for_stardust(0).is_none());
    }

    #[test]
    fn bands_do_not_overlap() {
        let mut seen = Vec::new();
        for (cost, _, _) in STARDUST_BANDS {
            for level in levels_for_stardust(*cost).unwrap_or_default() {
                assert!(!seen.contains(&level), "level {level} appears in two bands");
                seen.push(level);
            }
        }
        assert_eq!(seen.len(), 78);
        assert!(!seen.contains(&Level::new(40.0).unwrap()));
    }
}
