//! Error types for pattern compilation, printing and parsing.

use tempora_chrono::{ChronoError, IllegalFieldValue};
use thiserror::Error;

/// Characters of input kept after the failure position in messages.
const SAMPLE_TAIL: usize = 32;

/// Errors raised while building formatters or printing and parsing text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The pattern string could not be compiled.
    #[error("{0}")]
    IllegalPattern(String),

    /// A builder call was given an impossible configuration.
    #[error("{0}")]
    InvalidBuilder(String),

    /// A builder call came at a point where it cannot apply, such as a
    /// suffix with no field before it.
    #[error("{0}")]
    IllegalState(String),

    #[error("Printing not supported")]
    PrintingNotSupported,

    #[error("Parsing not supported")]
    ParsingNotSupported,

    /// A `FormatSettings` value named an unknown locale or zone.
    #[error("Invalid format settings: {0}")]
    InvalidSettings(String),

    /// The text did not match; `position` is the byte offset where the
    /// parser stopped.
    #[error("{message}")]
    InvalidFormat {
        text: String,
        position: usize,
        message: String,
    },

    /// The text parsed, but a field value is outside its legal range.
    #[error(transparent)]
    IllegalFieldValue(IllegalFieldValue),

    /// The parsed local time does not exist in the zone (a DST gap).
    #[error("{}Illegal instant due to time zone offset transition ({zone})", cannot_parse_prefix(.text))]
    IllegalInstant { text: Option<String>, zone: String },

    #[error(transparent)]
    Chrono(ChronoError),
}

/// Convenience alias used throughout tempora-format.
pub type Result<T> = std::result::Result<T, FormatError>;

impl From<ChronoError> for FormatError {
    fn from(err: ChronoError) -> Self {
        match err {
            ChronoError::IllegalFieldValue(inner) => FormatError::IllegalFieldValue(inner),
            other => FormatError::Chrono(other),
        }
    }
}

impl From<IllegalFieldValue> for FormatError {
    fn from(err: IllegalFieldValue) -> Self {
        FormatError::IllegalFieldValue(err)
    }
}

impl FormatError {
    /// A parse failure at `position` of `text`, with a readable message.
    pub fn invalid_format(text: &str, position: usize) -> Self {
        FormatError::InvalidFormat {
            text: text.to_string(),
            position,
            message: create_error_message(text, position),
        }
    }

    /// Byte offset of a parse failure, if this is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            FormatError::InvalidFormat { position, .. } => Some(*position),
            _ => None,
        }
    }
}

fn cannot_parse_prefix(text: &Option<String>) -> String {
    match text {
        Some(text) => format!("Cannot parse \"{text}\": "),
        None => String::new(),
    }
}

/// Builds `Invalid format: "<sample>"` plus a suffix saying whether the text
/// was too short or where it went wrong. Long inputs are cut 32 characters
/// past the failure and marked with `...`.
pub fn create_error_message(text: &str, position: usize) -> String {
    let sample = if text.len() <= position + SAMPLE_TAIL + 3 {
        text.to_string()
    } else {
        let mut cut = position + SAMPLE_TAIL;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &text[..cut])
    };
    if position == 0 {
        format!("Invalid format: \"{sample}\"")
    } else if position >= text.len() {
        format!("Invalid format: \"{sample}\" is too short")
    } else {
        let rest = sample.get(position..).unwrap_or_default();
        format!("Invalid format: \"{sample}\" is malformed at \"{rest}\"")
    }
}
