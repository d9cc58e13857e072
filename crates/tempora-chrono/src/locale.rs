//! Locales and the text tables that name eras, months, weekdays and halfdays.
//!
//! Only a handful of languages ship tables; any other language falls back
//! to English text while keeping its own identity (and cache key).

use std::fmt;
use std::str::FromStr;

use crate::error::{ChronoError, Result};

/// A language with an optional region, e.g. `en` or `fr-FR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            country: None,
        }
    }

    pub fn with_country(language: &str, country: &str) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            country: Some(country.to_ascii_uppercase()),
        }
    }

    pub fn english() -> Self {
        Self::new("en")
    }

    /// Parses a tag such as `en`, `en-US` or `de_DE`.
    ///
    /// # Errors
    /// Returns `ChronoError::InvalidLocale` for an empty or malformed tag.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        let valid_language =
            (2..=3).contains(&language.len()) && language.bytes().all(|b| b.is_ascii_alphabetic());
        if !valid_language {
            return Err(ChronoError::InvalidLocale(tag.to_string()));
        }
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Self::new(language)),
            (Some(country), None)
                if (country.len() == 2 && country.bytes().all(|b| b.is_ascii_alphabetic()))
                    || (country.len() == 3 && country.bytes().all(|b| b.is_ascii_digit())) =>
            {
                Ok(Self::with_country(language, country))
            }
            _ => Err(ChronoError::InvalidLocale(tag.to_string())),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The text table for this locale's language.
    pub fn symbols(&self) -> &'static Symbols {
        match self.language.as_str() {
            "fr" => &FRENCH,
            "de" => &GERMAN,
            _ => &ENGLISH,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Textual names for one language.
///
/// Arrays are indexed from the field's minimum: eras from BC (0), months from
/// January (1), weekdays from Monday (1), halfdays from AM (0).
#[derive(Debug)]
pub struct Symbols {
    pub eras: [&'static str; 2],
    pub months: [&'static str; 12],
    pub short_months: [&'static str; 12],
    pub weekdays: [&'static str; 7],
    pub short_weekdays: [&'static str; 7],
    pub halfdays: [&'static str; 2],
}

static ENGLISH: Symbols = Symbols {
    eras: ["BC", "AD"],
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    short_months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
    short_weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    halfdays: ["AM", "PM"],
};

static FRENCH: Symbols = Symbols {
    eras: ["av. J.-C.", "ap. J.-C."],
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    short_months: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
        "déc.",
    ],
    weekdays: [
        "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    ],
    short_weekdays: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
    halfdays: ["AM", "PM"],
};

static GERMAN: Symbols = Symbols {
    eras: ["v. Chr.", "n. Chr."],
    months: [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ],
    short_months: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    weekdays: [
        "Montag",
        "Dienstag",
        "Mittwoch",
        "Donnerstag",
        "Freitag",
        "Samstag",
        "Sonntag",
    ],
    short_weekdays: ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
    halfdays: ["AM", "PM"],
};
