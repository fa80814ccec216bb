use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// The text did not match the expected grammar. `expected` describes
    /// what would have been accepted.
    Parse { text: String, expected: String },
    /// A token used an abbreviation that belongs to another dimension,
    /// e.g. "5kg" where a volume was required.
    WrongDimension {
        abbrev: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl UnitError {
    pub fn parse(text: &str, expected: impl Into<String>) -> Self {
        UnitError::Parse {
            text: text.to_string(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::Parse { text, expected } => {
                write!(f, "Unable to parse '{}': expected {}", text, expected)
            }
            UnitError::WrongDimension {
                abbrev,
                expected,
                found,
            } => write!(
                f,
                "Unit '{}' is a {} unit, but a {} was expected",
                abbrev, found, expected
            ),
        }
    }
}

impl std::error::Error for UnitError {}
