//! Canadian postal code normalization.
//!
//! Users type postal codes in every shape (`h2x1y6`, `H2X 1Y6`, ` h2x 1y6 `).
//! The scheduling API and the booking portal both expect the canonical
//! `A1A 1A1` form, so everything downstream takes a [`PostalCode`].

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::ConfigError;

static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9][A-Z] [0-9][A-Z][0-9]$").expect("valid regex"));

/// Characters escaped in the booking URL query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'&').add(b'+');

/// A validated postal code in `A1A 1A1` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalizes and validates user input.
    ///
    /// Trims, uppercases, and inserts the middle space when the input has
    /// none (`h2x1y6` → `H2X 1Y6`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPostalCode`] when the normalized value is
    /// not letter-digit-letter, space, digit-letter-digit.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let upper = raw.trim().to_uppercase();
        let normalized = if upper.contains(' ') {
            upper
        } else {
            match (upper.get(..3), upper.get(3..)) {
                (Some(head), Some(tail)) => format!("{head} {tail}"),
                _ => upper,
            }
        };

        if CANONICAL_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(ConfigError::InvalidPostalCode(normalized))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for embedding in a URL query (`H2X%201Y6`).
    #[must_use]
    pub fn url_encoded(&self) -> String {
        utf8_percent_encode(&self.0, QUERY_VALUE).to_string()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_missing_space_and_uppercases() {
        let code = PostalCode::parse("h2x1y6").unwrap();
        assert_eq!(code.as_str(), "H2X 1Y6");
    }

    #[test]
    fn keeps_existing_space() {
        let code = PostalCode::parse("H2X 1Y6").unwrap();
        assert_eq!(code.as_str(), "H2X 1Y6");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let code = PostalCode::parse("  g1r 4p5 ").unwrap();
        assert_eq!(code.as_str(), "G1R 4P5");
    }

    #[test]
    fn rejects_wrong_length() {
        let err = PostalCode::parse("H2X1Y").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPostalCode(ref v) if v == "H2X 1Y"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(PostalCode::parse("123456").is_err());
        assert!(PostalCode::parse("H2X  1Y6").is_err());
        assert!(PostalCode::parse("").is_err());
    }

    #[test]
    fn rejects_non_ascii_without_panicking() {
        assert!(PostalCode::parse("É2X1Y6").is_err());
    }

    #[test]
    fn url_encodes_the_space() {
        let code = PostalCode::parse("H2X 1Y6").unwrap();
        assert_eq!(code.url_encoded(), "H2X%201Y6");
    }

    #[test]
    fn from_str_matches_parse() {
        let code: PostalCode = "j4k2t1".parse().unwrap();
        assert_eq!(code.to_string(), "J4K 2T1");
    }
}
