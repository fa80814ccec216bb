use serde::Serialize;
use std::str::FromStr;

use crate::units::{vol, Correction, Gravity, Quantity, UnitError, Vol};

/// One runnings draw: a volume of wort and the gravity measured for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lot {
    pub volume: Quantity<Vol>,
    pub gravity: Gravity,
}

impl Lot {
    pub fn new(volume: Quantity<Vol>, gravity: Gravity) -> Self {
        Self { volume, gravity }
    }

    /// Sugar contributed by this lot, in gravity points times liters.
    pub fn sugar(&self) -> f64 {
        self.gravity.points() * self.volume.base()
    }
}

impl FromStr for Lot {
    type Err = UnitError;

    /// Accepts `<volume>/<gravity>`, e.g. "3/18" or "3gal/1.050c". A bare
    /// number on the volume side means gallons. The gravity reading is
    /// assumed uncorrected unless suffixed with 'c'.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (volume_text, gravity_text) = s.split_once('/').ok_or_else(|| {
            UnitError::parse(s, "a lot in the form <volume>/<gravity>, e.g. '3/18'")
        })?;

        let volume = parse_volume_side(volume_text.trim())?;
        let gravity = Gravity::from_text(gravity_text.trim(), Correction::Uncorrected)
            .map_err(|e| UnitError::parse(gravity_text.trim(), format!("a gravity reading ({})", e)))?;

        Ok(Lot::new(volume, gravity))
    }
}

fn parse_volume_side(text: &str) -> Result<Quantity<Vol>, UnitError> {
    if let Ok(gallons) = text.parse::<f64>() {
        return Ok(Quantity::of(gallons, vol::GAL));
    }
    match Quantity::from_text(text) {
        Ok(volume) => Ok(volume),
        Err(e @ UnitError::WrongDimension { .. }) => Err(e),
        Err(_) => Err(UnitError::parse(
            text,
            "a volume for the lot, either gallons ('3') or a unit string ('3gal', '12l')",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_volume_and_brix() {
        let lot: Lot = "3/18".parse().unwrap();
        assert!((lot.volume.in_unit(vol::GAL) - 3.0).abs() < 1e-9);
        assert!((lot.gravity.points() - 72.0 / 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_parse_unit_volume_and_corrected_sg() {
        let lot: Lot = "12l/1.050c".parse().unwrap();
        assert!((lot.volume.in_unit(vol::L) - 12.0).abs() < 1e-9);
        assert!((lot.gravity.points() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_identifies_failing_side() {
        let err = "abc/18".parse::<Lot>().unwrap_err();
        assert!(err.to_string().contains("volume for the lot"), "{}", err);

        let err = "3/xyz".parse::<Lot>().unwrap_err();
        assert!(err.to_string().contains("gravity reading"), "{}", err);

        let err = "3gal".parse::<Lot>().unwrap_err();
        assert!(err.to_string().contains("<volume>/<gravity>"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_mass_volume() {
        let err = "3kg/18".parse::<Lot>().unwrap_err();
        assert!(matches!(err, UnitError::WrongDimension { .. }));
    }
}
