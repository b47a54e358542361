//! Piecewise rate schedules.
//!
//! A table is an ordered list of bands scanned first-match-wins. FLAT bands
//! contain `[lower, upper]` inclusive on both ends (an absent `upper` is
//! open-ended). A PERCENT band applies from `lower` upward and yields the
//! fraction of the full input value, not just the excess over `lower`.

use crate::domain::model::Amount;
use crate::utils::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandMode {
    #[default]
    Flat,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    pub lower: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(default)]
    pub mode: BandMode,
    pub value: f64,
}

impl RateBand {
    pub const fn flat(lower: f64, upper: f64, value: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
            mode: BandMode::Flat,
            value,
        }
    }

    pub const fn flat_from(lower: f64, value: f64) -> Self {
        Self {
            lower,
            upper: None,
            mode: BandMode::Flat,
            value,
        }
    }

    pub const fn percent_from(lower: f64, fraction: f64) -> Self {
        Self {
            lower,
            upper: None,
            mode: BandMode::Percent,
            value: fraction,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        match self.mode {
            BandMode::Percent => x >= self.lower,
            BandMode::Flat => x >= self.lower && self.upper.map_or(true, |upper| x <= upper),
        }
    }

    fn is_open_ended(&self) -> bool {
        self.mode == BandMode::Percent || self.upper.is_none()
    }

    fn apply(&self, x: f64) -> f64 {
        match self.mode {
            BandMode::Flat => self.value,
            BandMode::Percent => x * self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    bands: Vec<RateBand>,
}

impl RateTable {
    pub fn new(bands: Vec<RateBand>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[RateBand] {
        &self.bands
    }

    /// Index of the band that resolves `x`, if any.
    pub fn matching_band(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        self.bands.iter().position(|band| band.contains(x))
    }

    pub fn lookup(&self, x: f64) -> Amount {
        match self.matching_band(x) {
            Some(index) => {
                let band = &self.bands[index];
                tracing::trace!(x, index, lower = band.lower, "rate band matched");
                Amount::known(band.apply(x))
            }
            None => Amount::Unknown,
        }
    }

    /// Highest inclusive ceiling among bounded FLAT bands.
    pub fn flat_ceiling(&self) -> Option<f64> {
        self.bands
            .iter()
            .filter(|band| band.mode == BandMode::Flat)
            .filter_map(|band| band.upper)
            .reduce(f64::max)
    }

    pub fn percent_threshold(&self) -> Option<f64> {
        self.bands
            .iter()
            .find(|band| band.mode == BandMode::Percent)
            .map(|band| band.lower)
    }

    /// Checks the authoring invariants: starts at zero, lower bounds strictly
    /// ascending, no band starts inside the previous one (touching endpoints
    /// are allowed and resolved first-match), values non-negative, and only
    /// the last band may be open-ended.
    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| QuoteError::ConfigValidationError {
            field: name.to_string(),
            message: reason,
        };

        let first = self
            .bands
            .first()
            .ok_or_else(|| invalid("rate table has no bands".to_string()))?;
        if first.lower != 0.0 {
            return Err(invalid(format!(
                "first band must start at 0, starts at {}",
                first.lower
            )));
        }

        let last_index = self.bands.len() - 1;
        for (index, band) in self.bands.iter().enumerate() {
            if !band.lower.is_finite() || !band.value.is_finite() || band.value < 0.0 {
                return Err(invalid(format!("band {} has a non-finite or negative bound/value", index)));
            }
            if let (BandMode::Flat, Some(upper)) = (band.mode, band.upper) {
                if !(upper >= band.lower) {
                    return Err(invalid(format!(
                        "band {} upper bound {} is below its lower bound {}",
                        index, upper, band.lower
                    )));
                }
            }
            if band.is_open_ended() && index != last_index {
                return Err(invalid(format!(
                    "band {} is open-ended but is not the last band",
                    index
                )));
            }
            if index > 0 {
                let previous = &self.bands[index - 1];
                if band.lower <= previous.lower {
                    return Err(invalid(format!(
                        "band {} lower bound {} is not above band {} lower bound {}",
                        index,
                        band.lower,
                        index - 1,
                        previous.lower
                    )));
                }
                if let Some(prev_upper) = previous.upper {
                    if band.lower < prev_upper {
                        return Err(invalid(format!(
                            "band {} starts at {} inside band {} (ends at {})",
                            index,
                            band.lower,
                            index - 1,
                            prev_upper
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<RateBand>> for RateTable {
    fn from(bands: Vec<RateBand>) -> Self {
        Self::new(bands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::new(vec![
            RateBand::flat(0.0, 99.99, 10.0),
            RateBand::flat(100.0, 199.99, 20.0),
            RateBand::percent_from(200.0, 0.1),
        ])
    }

    #[test]
    fn test_negative_and_non_finite_inputs_are_unknown() {
        let tables = [
            table(),
            RateTable::new(vec![RateBand::flat_from(0.0, 5.0)]),
            RateTable::default(),
        ];
        for t in &tables {
            for x in [-0.01, -1000.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert_eq!(t.lookup(x), Amount::Unknown, "x = {}", x);
            }
        }
    }

    #[test]
    fn test_flat_bands_are_inclusive_on_both_ends() {
        let t = table();
        assert_eq!(t.lookup(0.0), Amount::Known(10.0));
        assert_eq!(t.lookup(99.99), Amount::Known(10.0));
        assert_eq!(t.lookup(100.0), Amount::Known(20.0));
        assert_eq!(t.lookup(199.99), Amount::Known(20.0));
    }

    #[test]
    fn test_percent_band_applies_to_full_value() {
        let t = table();
        assert_eq!(t.lookup(200.0), Amount::Known(20.0));
        assert_eq!(t.lookup(1000.0), Amount::Known(100.0));
        assert_eq!(t.percent_threshold(), Some(200.0));
        assert_eq!(t.flat_ceiling(), Some(199.99));
    }

    #[test]
    fn test_gap_between_bands_is_unknown() {
        let t = table();
        assert_eq!(t.lookup(99.995), Amount::Unknown);
    }

    #[test]
    fn test_touching_bands_resolve_to_first() {
        let t = RateTable::new(vec![
            RateBand::flat(0.0, 100.0, 0.0),
            RateBand::flat(100.0, 500.0, 40.0),
            RateBand::flat_from(500.0, 55.0),
        ]);
        assert_eq!(t.lookup(100.0), Amount::Known(0.0));
        assert_eq!(t.lookup(100.01), Amount::Known(40.0));
        assert_eq!(t.lookup(1_000_000.0), Amount::Known(55.0));
        assert!(t.validate("touching").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(RateTable::default().validate("empty").is_err());

        let not_from_zero = RateTable::new(vec![RateBand::flat_from(1.0, 5.0)]);
        assert!(not_from_zero.validate("t").is_err());

        let overlapping = RateTable::new(vec![
            RateBand::flat(0.0, 100.0, 1.0),
            RateBand::flat(50.0, 200.0, 2.0),
        ]);
        assert!(overlapping.validate("t").is_err());

        let open_in_middle = RateTable::new(vec![
            RateBand::percent_from(0.0, 0.1),
            RateBand::flat(100.0, 200.0, 2.0),
        ]);
        assert!(open_in_middle.validate("t").is_err());

        let inverted = RateTable::new(vec![RateBand::flat(0.0, -1.0, 1.0)]);
        assert!(inverted.validate("t").is_err());

        assert!(table().validate("t").is_ok());
    }

    #[test]
    fn test_bands_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            bands: RateTable,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
[[bands]]
lower = 0.0
upper = 99.99
value = 10.0

[[bands]]
lower = 100.0
mode = "percent"
value = 0.05
"#,
        )
        .unwrap();

        assert_eq!(parsed.bands.bands().len(), 2);
        assert_eq!(parsed.bands.lookup(50.0), Amount::Known(10.0));
        assert_eq!(parsed.bands.lookup(1000.0), Amount::Known(50.0));
    }
}
