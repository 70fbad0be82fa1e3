//! Small validated value types shared across the Patientor crates.
//!
//! - [`NonEmptyText`]: text with at least one non-whitespace character, kept as written.
//! - [`IsoDate`]: a calendar date written strictly as `YYYY-MM-DD`.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing an [`IsoDate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    /// The input was not shaped like `YYYY-MM-DD`.
    #[error("date must be formatted as YYYY-MM-DD, got '{0}'")]
    Format(String),
    /// The input was shaped correctly but names a day that does not exist.
    #[error("'{0}' is not a valid calendar date")]
    Calendar(String),
}

/// A string type that guarantees non-empty content.
///
/// Surrounding whitespace is allowed and preserved; only all-whitespace input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A calendar date in ISO 8601 extended form (`YYYY-MM-DD`).
///
/// Parsing is strict: exactly four year digits, two month digits and two day digits
/// separated by `-`, and the day must exist (so `2023-02-29` is rejected).
/// Display always produces the same canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate(NaiveDate);

impl IsoDate {
    /// Parses a strict `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Format`] when the shape is wrong and
    /// [`DateError::Calendar`] when the day does not exist.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let bytes = input.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shaped {
            return Err(DateError::Format(input.to_owned()));
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateError::Calendar(input.to_owned()))
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for IsoDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IsoDate::parse(s)
    }
}

impl serde::Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IsoDate::parse(&s).map_err(serde::de::Error::custom)
    }
}
