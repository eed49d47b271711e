//! Validated value types shared across the catalogue crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a [`Price`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PriceError {
    #[error("price must be a number, got '{0}'")]
    NotANumber(String),
    #[error("price must be non-negative, got {0}")]
    Negative(f64),
    #[error("price must be finite")]
    NotFinite,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
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

/// A finite, non-negative unit price.
///
/// Stored as an `f64` and serialised as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Creates a price from a number.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the value is NaN, infinite or negative.
    pub fn new(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative(value));
        }
        // Normalise -0.0 so it serialises as 0.0.
        Ok(Self(value + 0.0))
    }

    /// Parses a price from untrusted text, tolerating surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the text is not a decimal number, otherwise the same
    /// errors as [`Price::new`].
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl serde::Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Price::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Widget ").unwrap().as_str(), "Widget");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_empty() {
        let err = serde_json::from_str::<NonEmptyText>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn price_parse_accepts_decimals_and_integers() {
        assert_eq!(Price::parse("9.99").unwrap().value(), 9.99);
        assert_eq!(Price::parse(" 5 ").unwrap().value(), 5.0);
        assert_eq!(Price::parse("0").unwrap().value(), 0.0);
    }

    #[test]
    fn price_parse_rejects_garbage_and_negatives() {
        assert!(matches!(
            Price::parse("abc"),
            Err(PriceError::NotANumber(s)) if s == "abc"
        ));
        assert!(matches!(Price::parse("-1"), Err(PriceError::Negative(_))));
        assert_eq!(Price::parse("inf"), Err(PriceError::NotFinite));
        assert_eq!(Price::parse("NaN"), Err(PriceError::NotFinite));
    }

    #[test]
    fn price_serialises_as_number() {
        let json = serde_json::to_string(&Price::new(9.99).unwrap()).unwrap();
        assert_eq!(json, "9.99");
        assert!(serde_json::from_str::<Price>("-2.5").is_err());
    }
}
