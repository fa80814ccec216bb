// Unit-tagged quantities and gravity readings. Mass and volume are distinct
// types, so mixing them in arithmetic fails at compile time rather than at
// runtime.

pub mod error;
pub mod gravity;
pub mod parser;
pub mod quantity;

pub use error::UnitError;
pub use gravity::{Correction, Gravity};
pub use quantity::{mass, vol, Dimension, Mass, Quantity, Unit, Vol};
