use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::units::error::UnitError;

/// Wort correction factor for refractometer readings.
const WORT_CORRECTION: f64 = 1.04;

/// Readings below this are specific gravities; at or above, Brix.
const BRIX_CUTOFF: f64 = 1.5;

lazy_static! {
    static ref READING: Regex = Regex::new(r"^(?P<quantity>\d+(\.\d+)?)(?P<correction>[cu])?$").unwrap();
}

/// Whether a refractometer reading has already had the wort correction
/// factor applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    Corrected,
    Uncorrected,
}

/// Specific gravity of a wort sample, stored as `1 + points/1000`.
///
/// Gravity points are the additive proxy for dissolved sugar: blending math
/// pools `points × volume`, which specific gravity itself does not support.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Gravity {
    specific_gravity: f64,
}

impl Gravity {
    pub fn from_points(points: f64) -> Self {
        Self {
            specific_gravity: 1.0 + points / 1000.0,
        }
    }

    pub fn from_brix(brix: f64) -> Self {
        Self::from_points(brix * 4.0)
    }

    /// Build from a number that is either a true specific gravity or a
    /// points figure. Values strictly between 1 and 1.2 can only be
    /// specific gravities (no one targets 1.2 points); anything else is
    /// taken as points.
    pub fn from_sg(sg: f64) -> Self {
        if sg > 1.0 && sg < 1.2 {
            Self::from_points((sg - 1.0) * 1000.0)
        } else {
            Self::from_points(sg)
        }
    }

    /// Parse a reading like "18", "12.5u", "1.050c". Numbers below 1.5 are
    /// specific gravities, otherwise Brix. A trailing 'c' marks the reading
    /// as already corrected, 'u' as uncorrected; with neither, `default`
    /// decides. Uncorrected readings get `points / 1.04`.
    pub fn from_text(text: &str, default: Correction) -> Result<Self, UnitError> {
        let normalized = text.trim().to_lowercase();
        let caps = READING
            .captures(&normalized)
            .ok_or_else(|| Self::bad_reading(text))?;

        let quantity: f64 = caps["quantity"]
            .parse()
            .map_err(|_| Self::bad_reading(text))?;

        let correction = match caps.name("correction").map(|m| m.as_str()) {
            Some("c") => Correction::Corrected,
            Some(_) => Correction::Uncorrected,
            None => default,
        };

        let reading = if quantity < BRIX_CUTOFF {
            Self::from_sg(quantity)
        } else {
            Self::from_brix(quantity)
        };

        Ok(match correction {
            Correction::Corrected => reading,
            Correction::Uncorrected => Self::from_points(reading.points() / WORT_CORRECTION),
        })
    }

    fn bad_reading(text: &str) -> UnitError {
        UnitError::parse(
            text,
            "a number optionally followed by 'c' (corrected) or 'u' (uncorrected)",
        )
    }

    pub fn specific_gravity(&self) -> f64 {
        self.specific_gravity
    }

    pub fn points(&self) -> f64 {
        (self.specific_gravity - 1.0) * 1000.0
    }

    pub fn brix(&self) -> f64 {
        self.points() / 4.0
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.specific_gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brix_round_trip() {
        let g = Gravity::from_brix(18.0);
        assert!((g.brix() - 18.0).abs() < 1e-9);
        assert!((g.points() - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_sg_heuristic() {
        // Inside the (1, 1.2) window: a true specific gravity.
        let g = Gravity::from_sg(1.050);
        assert!((g.points() - 50.0).abs() < 1e-9);
        assert!((g.specific_gravity() - 1.050).abs() < 1e-9);

        // Outside the window: already a points figure.
        let g = Gravity::from_sg(50.0);
        assert!((g.points() - 50.0).abs() < 1e-9);

        let g = Gravity::from_sg(0.0);
        assert!((g.specific_gravity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_points_skips_heuristic() {
        // 1.1 points is a legitimate pre-boil figure and must not be read
        // as SG 1.100.
        let g = Gravity::from_points(1.1);
        assert!((g.points() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_ordering() {
        assert!(Gravity::from_brix(18.0) > Gravity::from_brix(12.5));
        assert_eq!(Gravity::from_brix(12.5), Gravity::from_points(50.0));
    }

    #[test]
    fn test_from_text_brix_uncorrected_default() {
        let g = Gravity::from_text("18", Correction::Uncorrected).unwrap();
        assert!((g.points() - 72.0 / 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_from_text_explicit_suffixes() {
        let corrected = Gravity::from_text("18c", Correction::Uncorrected).unwrap();
        assert!((corrected.points() - 72.0).abs() < 1e-9);

        let uncorrected = Gravity::from_text("18U", Correction::Corrected).unwrap();
        assert!((uncorrected.points() - 72.0 / 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_from_text_specific_gravity_reading() {
        let g = Gravity::from_text("1.050c", Correction::Uncorrected).unwrap();
        assert!((g.points() - 50.0).abs() < 1e-9);

        // Default applies when no suffix is present.
        let g = Gravity::from_text("12.5", Correction::Corrected).unwrap();
        assert!((g.points() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_text_rejects_malformed() {
        assert!(Gravity::from_text("", Correction::Uncorrected).is_err());
        assert!(Gravity::from_text("abc", Correction::Uncorrected).is_err());
        assert!(Gravity::from_text("18x", Correction::Uncorrected).is_err());
        assert!(Gravity::from_text("18 c", Correction::Uncorrected).is_err());
    }
}
