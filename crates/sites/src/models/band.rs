use std::fmt::{Display, Formatter, Result as FmtResult};

/// Radar frequency band.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Band {
    /// S-band (~10 cm)
    S,
    /// C-band (~5 cm)
    C,
    /// X-band (~3 cm)
    X,
    /// Anything the table records that is not one of the above, including
    /// an empty cell.
    Unknown(String),
}
impl Band {
    pub fn as_str(&self) -> &str {
        match self {
            Band::S => "S",
            Band::C => "C",
            Band::X => "X",
            Band::Unknown(other) => other,
        }
    }
}
impl From<&str> for Band {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_uppercase().as_str() {
            "S" => Self::S,
            "C" => Self::C,
            "X" => Self::X,
            _ => Self::Unknown(value.to_string()),
        }
    }
}
impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("S", Band::S)]
    #[case("s", Band::S)]
    #[case(" c ", Band::C)]
    #[case("X", Band::X)]
    #[case("", Band::Unknown(String::new()))]
    #[case("Ku", Band::Unknown("Ku".to_string()))]
    fn test_band_from_str(#[case] input: &str, #[case] expected: Band) {
        assert_eq!(Band::from(input), expected);
    }
}
