//! Locale text elements: month and weekday names, eras, AM/PM.

use std::collections::HashSet;

use tempora_chrono::{Chronology, DateTimeFieldType, Locale, ReadablePartial};

use super::{append_unknown, ParseOutcome, PrintContext, UNKNOWN_CHAR};
use crate::bucket::ParserBucket;

/// Fields spanning more values than this have no text form.
const MAX_TEXT_VALUES: i32 = 32;

/// Every accepted rendering of one field's values in one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLookup {
    values: HashSet<String>,
    max_length: usize,
}

impl TextLookup {
    /// Collects long and short text for every value of `field_type`, each
    /// also in lower and upper case. Returns `None` for fields too wide to be
    /// textual, such as `year`.
    pub fn build(
        chronology: &dyn Chronology,
        field_type: DateTimeFieldType,
        locale: &Locale,
    ) -> Option<Self> {
        let field = chronology.field(field_type);
        let (min, max) = (field.minimum_value(), field.maximum_value());
        if max - min > MAX_TEXT_VALUES {
            return None;
        }
        let mut values = HashSet::new();
        for value in min..=max {
            for text in [field.as_short_text(value, locale), field.as_text(value, locale)] {
                values.insert(text.to_lowercase());
                values.insert(text.to_uppercase());
                values.insert(text);
            }
        }
        let mut max_length = field.maximum_text_length(locale);
        if field_type == DateTimeFieldType::Era && locale.language() == "en" {
            values.extend(["BCE", "bce", "CE", "ce"].map(String::from));
            max_length = 3;
        }
        Some(Self { values, max_length })
    }

    pub fn contains(&self, text: &str) -> bool {
        self.values.contains(text)
    }

    /// Longest accepted rendering, in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A field printed as locale text, long or short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    field: DateTimeFieldType,
    short: bool,
}

impl TextField {
    pub fn new(field: DateTimeFieldType, short: bool) -> Self {
        Self { field, short }
    }

    pub fn field(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn is_short(&self) -> bool {
        self.short
    }

    pub(crate) fn estimate_length(&self) -> usize {
        if self.short {
            6
        } else {
            20
        }
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        let field = ctx.chronology.field(self.field);
        match field.get(ctx.local_millis) {
            Ok(value) if self.short => out.push_str(&field.as_short_text(value, ctx.locale)),
            Ok(value) => out.push_str(&field.as_text(value, ctx.locale)),
            Err(_) => out.push(UNKNOWN_CHAR),
        }
    }

    pub(crate) fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial, locale: &Locale) {
        let Some(value) = partial.get(self.field) else {
            append_unknown(out, 1);
            return;
        };
        let chronology = partial.chronology();
        let field = chronology.field(self.field);
        if self.short {
            out.push_str(&field.as_short_text(value, locale));
        } else {
            out.push_str(&field.as_text(value, locale));
        }
    }

    /// Matches the longest accepted rendering at `position`. The text is
    /// saved as is and mapped to a value only when the bucket resolves.
    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let lookup = bucket.text_lookup(self.field).ok_or(position)?;
        let rest = text.get(position..).ok_or(position)?;
        let ends: Vec<usize> = rest
            .char_indices()
            .take(lookup.max_length())
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        for end in ends.into_iter().rev() {
            let candidate = &rest[..end];
            if lookup.contains(candidate) {
                bucket.save_field_text(self.field, candidate);
                return Ok(position + end);
            }
        }
        Err(position)
    }
}
