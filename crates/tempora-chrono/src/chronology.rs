//! The calendar abstraction consumed by the formatting engine.
//!
//! A [`Chronology`] hands out [`DateTimeField`]s that read and write one
//! calendar field against a local millisecond instant. Fields never look at
//! zones; the chronology's zone is metadata that callers use to shift
//! instants into local millis and back.

use std::fmt;
use std::sync::Arc;

use crate::error::{ChronoError, IllegalFieldValue, Result};
use crate::field_type::{DateTimeFieldType, DurationField, DurationFieldType};
use crate::locale::Locale;
use crate::partial::ReadablePartial;
use crate::zone::DateTimeZone;

/// Shared handle to a chronology.
pub type ChronologyRef = Arc<dyn Chronology>;

/// Reads and writes one calendar field against local millis.
pub trait DateTimeField: fmt::Debug + Send + Sync {
    fn field_type(&self) -> DateTimeFieldType;

    fn is_supported(&self) -> bool {
        true
    }

    fn get(&self, instant: i64) -> Result<i32>;

    /// Sets the field, adjusting smaller fields only as far as needed to
    /// stay valid (e.g. Jan 31 + month 2 gives Feb 28/29).
    ///
    /// # Errors
    /// Returns `IllegalFieldValue` when `value` is outside the field's legal
    /// range at `instant`.
    fn set(&self, instant: i64, value: i32) -> Result<i64>;

    /// Sets the field from its textual form in `locale`.
    fn set_text(&self, instant: i64, text: &str, locale: &Locale) -> Result<i64> {
        let value = self.value_from_text(text, locale)?;
        self.set(instant, value)
    }

    /// Maps a textual form back to a value. Numeric fields accept digits.
    fn value_from_text(&self, text: &str, _locale: &Locale) -> Result<i32> {
        text.parse::<i32>()
            .map_err(|_| IllegalFieldValue::unsupported_text(self.field_type(), text).into())
    }

    fn as_text(&self, value: i32, _locale: &Locale) -> String {
        value.to_string()
    }

    fn as_short_text(&self, value: i32, locale: &Locale) -> String {
        self.as_text(value, locale)
    }

    /// Largest instant not after `instant` at which this field's own unit
    /// begins.
    fn round_floor(&self, instant: i64) -> Result<i64>;

    /// Millis elapsed since [`DateTimeField::round_floor`].
    fn remainder(&self, instant: i64) -> Result<i64> {
        Ok(instant - self.round_floor(instant)?)
    }

    fn duration_field(&self) -> DurationField;

    fn range_duration_field(&self) -> Option<DurationField>;

    /// Smallest value over all instants.
    fn minimum_value(&self) -> i32;

    /// Largest value over all instants.
    fn maximum_value(&self) -> i32;

    fn maximum_text_length(&self, _locale: &Locale) -> usize {
        let digits = |v: i32| v.unsigned_abs().to_string().len() + usize::from(v < 0);
        digits(self.minimum_value()).max(digits(self.maximum_value()))
    }

    fn maximum_short_text_length(&self, locale: &Locale) -> usize {
        self.maximum_text_length(locale)
    }
}

/// A calendar system bound to a zone.
pub trait Chronology: fmt::Debug + Send + Sync {
    /// Short identifier, e.g. `ISO`.
    fn name(&self) -> &'static str;

    fn zone(&self) -> DateTimeZone;

    fn with_zone(&self, zone: DateTimeZone) -> ChronologyRef;

    fn with_utc(&self) -> ChronologyRef {
        self.with_zone(DateTimeZone::UTC)
    }

    fn field(&self, field_type: DateTimeFieldType) -> &dyn DateTimeField;

    fn duration_field(&self, duration_type: DurationFieldType) -> DurationField;

    /// Applies every field the partial carries onto `instant`, largest first.
    fn set_partial(&self, partial: &dyn ReadablePartial, instant: i64) -> Result<i64> {
        partial
            .field_types()
            .into_iter()
            .try_fold(instant, |millis, field_type| {
                let value = partial
                    .get(field_type)
                    .ok_or(ChronoError::UnsupportedField(field_type))?;
                self.field(field_type).set(millis, value)
            })
    }
}

/// A field whose value is a count of `unit`s within `range`, e.g. millis
/// within a second. Used for values that have no named field of their own,
/// such as a parsed fraction of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreciseField {
    field_type: DateTimeFieldType,
    unit: DurationField,
    range: DurationField,
}

impl PreciseField {
    pub fn new(field_type: DateTimeFieldType, unit: DurationField, range: DurationField) -> Self {
        Self {
            field_type,
            unit,
            range,
        }
    }

    /// Millis counted within one `range` unit.
    pub fn millis_of(range: DurationField) -> Self {
        Self::new(DateTimeFieldType::MillisOfSecond, DurationField::millis(), range)
    }

    fn unit_millis(&self) -> i64 {
        self.unit.unit_millis().max(1)
    }

    fn span(&self) -> i64 {
        (self.range.unit_millis() / self.unit_millis()).max(1)
    }
}

impl DateTimeField for PreciseField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        let value = instant.div_euclid(self.unit_millis()).rem_euclid(self.span());
        i32::try_from(value).map_err(|_| ChronoError::InstantOutOfRange(instant))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let max = self.span() - 1;
        if i64::from(value) < 0 || i64::from(value) > max {
            return Err(
                IllegalFieldValue::out_of_range(self.field_type, i64::from(value), 0, max).into(),
            );
        }
        let current = self.get(instant)?;
        Ok(instant + i64::from(value - current) * self.unit_millis())
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(instant - instant.rem_euclid(self.unit_millis()))
    }

    fn duration_field(&self) -> DurationField {
        self.unit
    }

    fn range_duration_field(&self) -> Option<DurationField> {
        Some(self.range)
    }

    fn minimum_value(&self) -> i32 {
        0
    }

    fn maximum_value(&self) -> i32 {
        i32::try_from(self.span() - 1).unwrap_or(i32::MAX)
    }
}
