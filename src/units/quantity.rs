use serde::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};

use crate::units::error::UnitError;

const LB_TO_G: f64 = 453.592;
const GAL_TO_L: f64 = 3.78541;

/// A named unit belonging to dimension `D`: an abbreviation plus its scale
/// factor to the dimension's base unit (grams for mass, liters for volume).
pub struct Unit<D> {
    pub abbrev: &'static str,
    pub scale: f64,
    dim: PhantomData<D>,
}

impl<D> Unit<D> {
    pub const fn new(abbrev: &'static str, scale: f64) -> Self {
        Self {
            abbrev,
            scale,
            dim: PhantomData,
        }
    }
}

impl<D> Clone for Unit<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Unit<D> {}

/// A physical dimension with a fixed abbreviation table. The tag types are
/// uninhabited; they exist only to keep mass and volume arithmetic apart at
/// compile time.
pub trait Dimension: Sized + 'static {
    /// Dimension name used in error messages.
    const NAME: &'static str;
    /// Abbreviation of the base (storage) unit.
    const BASE: &'static str;

    /// Every recognized abbreviation. Table order does not matter; the
    /// scanner orders alternatives longest-first before matching.
    fn units() -> &'static [Unit<Self>];

    fn unit(abbrev: &str) -> Option<Unit<Self>> {
        Self::units().iter().copied().find(|u| u.abbrev == abbrev)
    }
}

pub enum Mass {}
pub enum Vol {}

impl Dimension for Mass {
    const NAME: &'static str = "mass";
    const BASE: &'static str = "g";

    fn units() -> &'static [Unit<Mass>] {
        const UNITS: &[Unit<Mass>] = &[
            mass::UG,
            mass::MG,
            mass::G,
            mass::KG,
            Unit::new("Mg", 1e6),
            mass::LB,
            mass::OZ,
            Unit::new("tons", LB_TO_G * 2000.0),
        ];
        UNITS
    }
}

impl Dimension for Vol {
    const NAME: &'static str = "volume";
    const BASE: &'static str = "l";

    fn units() -> &'static [Unit<Vol>] {
        const UNITS: &[Unit<Vol>] = &[
            vol::ML,
            vol::L,
            Unit::new("kl", 1e3),
            // "g" is the brewer's shorthand for gallons; it collides with
            // grams on the mass side, which is why parsing is per-dimension.
            Unit::new("g", GAL_TO_L),
            vol::GAL,
            vol::QT,
            vol::PT,
            vol::CUP,
            Unit::new("oz", GAL_TO_L / 128.0),
            vol::FLOZ,
        ];
        UNITS
    }
}

pub mod mass {
    use super::{Mass, Unit, LB_TO_G};

    pub const UG: Unit<Mass> = Unit::new("ug", 1e-6);
    pub const MG: Unit<Mass> = Unit::new("mg", 1e-3);
    pub const G: Unit<Mass> = Unit::new("g", 1.0);
    pub const KG: Unit<Mass> = Unit::new("kg", 1e3);
    pub const LB: Unit<Mass> = Unit::new("lb", LB_TO_G);
    pub const OZ: Unit<Mass> = Unit::new("oz", LB_TO_G / 12.0);
}

pub mod vol {
    use super::{Unit, Vol, GAL_TO_L};

    pub const ML: Unit<Vol> = Unit::new("ml", 1e-3);
    pub const L: Unit<Vol> = Unit::new("l", 1.0);
    pub const GAL: Unit<Vol> = Unit::new("gal", GAL_TO_L);
    pub const QT: Unit<Vol> = Unit::new("q", GAL_TO_L / 4.0);
    pub const PT: Unit<Vol> = Unit::new("p", GAL_TO_L / 8.0);
    pub const CUP: Unit<Vol> = Unit::new("c", GAL_TO_L / 16.0);
    pub const FLOZ: Unit<Vol> = Unit::new("floz", GAL_TO_L / 128.0);
}

/// An immutable magnitude stored in the base unit of dimension `D`.
/// Arithmetic across dimensions is a type error, not a runtime check.
pub struct Quantity<D> {
    base: f64,
    dim: PhantomData<D>,
}

impl<D> Quantity<D> {
    pub const fn from_base(base: f64) -> Self {
        Self {
            base,
            dim: PhantomData,
        }
    }

    pub const fn zero() -> Self {
        Self::from_base(0.0)
    }

    /// Magnitude in the base unit.
    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn of(quantity: f64, unit: Unit<D>) -> Self {
        Self::from_base(quantity * unit.scale)
    }

    pub fn in_unit(&self, unit: Unit<D>) -> f64 {
        self.base / unit.scale
    }
}

impl<D: Dimension> Quantity<D> {
    /// Parse a string of one or more `<number><unit>` tokens and sum them,
    /// e.g. "500g250mg" or "3gal".
    pub fn from_text(text: &str) -> Result<Self, UnitError> {
        crate::units::parser::parse_quantity(text)
    }
}

impl<D> Clone for Quantity<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Quantity<D> {}

impl<D> PartialEq for Quantity<D> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<D> PartialOrd for Quantity<D> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.base.partial_cmp(&other.base)
    }
}

impl<D: Dimension> fmt::Debug for Quantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, D::BASE)
    }
}

impl<D> Serialize for Quantity<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.base)
    }
}

impl<D> Add for Quantity<D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_base(self.base + rhs.base)
    }
}

impl<D> Sub for Quantity<D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_base(self.base - rhs.base)
    }
}

impl<D> Mul<f64> for Quantity<D> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::from_base(self.base * rhs)
    }
}

impl<D> Div<f64> for Quantity<D> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::from_base(self.base / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_and_in_unit_round_trip() {
        for unit in Mass::units() {
            let q = Quantity::of(2.5, *unit);
            assert!((q.in_unit(*unit) - 2.5).abs() < 1e-12, "{}", unit.abbrev);
        }
        for unit in Vol::units() {
            let q = Quantity::of(2.5, *unit);
            assert!((q.in_unit(*unit) - 2.5).abs() < 1e-12, "{}", unit.abbrev);
        }
    }

    #[test]
    fn test_base_conversions() {
        assert!((Quantity::of(1.0, vol::GAL).in_unit(vol::L) - 3.78541).abs() < 1e-12);
        assert!((Quantity::of(1.0, vol::GAL).in_unit(vol::QT) - 4.0).abs() < 1e-12);
        assert!((Quantity::of(1.0, mass::LB).in_unit(mass::G) - 453.592).abs() < 1e-12);
        assert!((Quantity::of(1.0, mass::LB).in_unit(mass::OZ) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Quantity::of(3.0, vol::GAL);
        let b = Quantity::of(1.0, vol::GAL);
        assert!(((a + b).in_unit(vol::GAL) - 4.0).abs() < 1e-12);
        assert!(((a - b).in_unit(vol::GAL) - 2.0).abs() < 1e-12);
        assert!(((a * 2.0).in_unit(vol::GAL) - 6.0).abs() < 1e-12);
        assert!(((a / 2.0).in_unit(vol::GAL) - 1.5).abs() < 1e-12);
        assert!(a > b);
    }
}
