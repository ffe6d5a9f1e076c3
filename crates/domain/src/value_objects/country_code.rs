//! ISO 3166-1 alpha-2 country code value object

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::DomainError;

/// Two-letter country code, always stored upper-case (e.g. "DE", "US")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code, accepting any letter case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountryCode` unless the trimmed input is
    /// exactly two ASCII letters.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCountryCode(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Upper-case representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case representation, as expected by Nominatim's `countrycodes`
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
