use lazy_static::lazy_static;
use regex::Regex;

use crate::units::error::UnitError;
use crate::units::quantity::{Dimension, Mass, Quantity, Vol};

lazy_static! {
    /// One scanner over every known abbreviation, both dimensions.
    /// Alternatives are ordered longest-first so "5gal" matches gallons
    /// rather than "5g" + a leftover "al".
    static ref TOKEN: Regex = Regex::new(&token_pattern()).unwrap();
}

fn token_pattern() -> String {
    let mut abbrevs: Vec<&'static str> = Mass::units()
        .iter()
        .map(|u| u.abbrev)
        .chain(Vol::units().iter().map(|u| u.abbrev))
        .collect();
    abbrevs.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    abbrevs.dedup();
    format!(
        r"(?P<quantity>(\d*\.)?\d+([eE][+-]?\d+)?)(?P<unit>{})",
        abbrevs.join("|")
    )
}

fn owning_dimension(abbrev: &str) -> Option<&'static str> {
    if Mass::unit(abbrev).is_some() {
        Some(Mass::NAME)
    } else if Vol::unit(abbrev).is_some() {
        Some(Vol::NAME)
    } else {
        None
    }
}

/// Scan `text` for every non-overlapping `<number><unit>` token of
/// dimension `D`, convert each to base units and sum them.
pub fn parse_quantity<D: Dimension>(text: &str) -> Result<Quantity<D>, UnitError> {
    let mut total = 0.0;
    let mut matched = false;

    for caps in TOKEN.captures_iter(text) {
        let abbrev = &caps["unit"];
        // Abbreviations shared by both tables ("g", "oz") resolve to the
        // dimension being parsed.
        let unit = D::unit(abbrev).ok_or_else(|| UnitError::WrongDimension {
            abbrev: abbrev.to_string(),
            expected: D::NAME,
            found: owning_dimension(abbrev).unwrap_or("unknown"),
        })?;
        let quantity: f64 = caps["quantity"]
            .parse()
            .map_err(|_| UnitError::parse(text, format!("a numeric {} quantity", D::NAME)))?;
        total += quantity * unit.scale;
        matched = true;
    }

    if !matched {
        return Err(UnitError::parse(
            text,
            format!("one or more <number><unit> {} tokens, e.g. '3{}'", D::NAME, D::BASE),
        ));
    }

    Ok(Quantity::from_base(total))
}
