//! Serializable formatter settings.
//!
//! Lets a formatter's locale, zone and parse defaults come from a config
//! file instead of code. Applied with [`Formatter::with_settings`].
//!
//! [`Formatter::with_settings`]: crate::Formatter::with_settings

use serde::{Deserialize, Serialize};
use tempora_chrono::{DateTimeZone, Locale};

use crate::error::{FormatError, Result};

/// Year assumed when a parsed value carries months or days but no year.
pub const DEFAULT_YEAR: i32 = 2000;

/// Overrides applied to a formatter. Every field is optional in serialized
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Locale tag such as `en` or `fr-FR`. Text fields print and parse in
    /// this locale.
    pub locale: Option<String>,
    /// Zone to print in and to return parsed values in: an IANA id, `UTC`,
    /// or a fixed offset such as `+05:30`.
    pub zone: Option<String>,
    /// Centre of the window two-digit years are parsed into.
    pub pivot_year: Option<i32>,
    pub default_year: i32,
    /// Keep a parsed offset as the zone of the parsed value.
    pub offset_parsed: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            locale: None,
            zone: None,
            pivot_year: None,
            default_year: DEFAULT_YEAR,
            offset_parsed: false,
        }
    }
}

impl FormatSettings {
    /// # Errors
    /// `InvalidSettings` when the tag is malformed.
    pub fn parsed_locale(&self) -> Result<Option<Locale>> {
        self.locale
            .as_deref()
            .map(|tag| {
                Locale::parse(tag)
                    .map_err(|err| FormatError::InvalidSettings(format!("locale: {err}")))
            })
            .transpose()
    }

    /// # Errors
    /// `InvalidSettings` when no zone has this id.
    pub fn parsed_zone(&self) -> Result<Option<DateTimeZone>> {
        self.zone
            .as_deref()
            .map(|id| {
                DateTimeZone::for_id(id)
                    .map_err(|err| FormatError::InvalidSettings(format!("zone: {err}")))
            })
            .transpose()
    }
}
