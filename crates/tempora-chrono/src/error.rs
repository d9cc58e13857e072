//! Error types for calendar field and zone operations.

use std::fmt;

use thiserror::Error;

use crate::field_type::DateTimeFieldType;

/// Errors raised by the chronology, zone and locale layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChronoError {
    /// A field rejected a value (out of range, or unrecognised text).
    #[error(transparent)]
    IllegalFieldValue(#[from] IllegalFieldValue),

    /// The field type exists but this chronology or partial does not carry it.
    #[error("Field '{0}' is not supported")]
    UnsupportedField(DateTimeFieldType),

    /// The millisecond instant cannot be represented by the calendar.
    #[error("Instant {0} is outside the supported range")]
    InstantOutOfRange(i64),

    /// No zone is known by this id.
    #[error("The datetime zone id '{0}' is not recognised")]
    UnknownZone(String),

    /// A fixed offset outside of -23:59:59.999..=+23:59:59.999.
    #[error("Millis out of range: {0}")]
    OffsetOutOfRange(i64),

    /// The locale tag could not be parsed.
    #[error("Invalid locale tag: {0}")]
    InvalidLocale(String),
}

/// Convenience alias used throughout tempora-chrono.
pub type Result<T> = std::result::Result<T, ChronoError>;

/// The value a field refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedValue {
    Number(i64),
    Text(String),
}

/// A field value the calendar cannot accept.
///
/// Carries the field, the offending value and, when known, the legal bounds.
/// Callers resolving parsed text attach a prefix naming that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalFieldValue {
    field: DateTimeFieldType,
    value: RejectedValue,
    lower: Option<i64>,
    upper: Option<i64>,
    prefix: Option<String>,
}

impl IllegalFieldValue {
    /// A numeric value outside `[lower, upper]`.
    pub fn out_of_range(field: DateTimeFieldType, value: i64, lower: i64, upper: i64) -> Self {
        Self {
            field,
            value: RejectedValue::Number(value),
            lower: Some(lower),
            upper: Some(upper),
            prefix: None,
        }
    }

    /// A textual value that maps to no field value.
    pub fn unsupported_text(field: DateTimeFieldType, text: &str) -> Self {
        Self {
            field,
            value: RejectedValue::Text(text.to_string()),
            lower: None,
            upper: None,
            prefix: None,
        }
    }

    /// Prepend context to the message, e.g. `Cannot parse "02-30"`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = Some(match self.prefix.take() {
            Some(existing) => format!("{prefix}: {existing}"),
            None => prefix,
        });
        self
    }

    pub fn field(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn value(&self) -> &RejectedValue {
        &self.value
    }

    pub fn lower_bound(&self) -> Option<i64> {
        self.lower
    }

    pub fn upper_bound(&self) -> Option<i64> {
        self.upper
    }
}

impl fmt::Display for IllegalFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}: ")?;
        }
        match &self.value {
            RejectedValue::Number(n) => write!(f, "Value {n} for {}", self.field)?,
            RejectedValue::Text(t) => write!(f, "Value \"{t}\" for {}", self.field)?,
        }
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => write!(f, " must be in the range [{lower},{upper}]"),
            (Some(lower), None) => write!(f, " must not be smaller than {lower}"),
            (None, Some(upper)) => write!(f, " must not be larger than {upper}"),
            (None, None) => write!(f, " is not supported"),
        }
    }
}

impl std::error::Error for IllegalFieldValue {}
