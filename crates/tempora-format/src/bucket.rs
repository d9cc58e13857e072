//! The per-parse accumulator and the algorithm that resolves its saved
//! fields into an instant.
//!
//! Elements save field values into a [`ParserBucket`] as they match text.
//! Nothing is applied until [`ParserBucket::compute_millis`], which orders
//! the saved fields by significance and sets them one by one on a calendar,
//! so a later, finer field (day of week) adjusts the result of an earlier,
//! coarser one (month) rather than the other way round.
//!
//! The bucket can be snapshotted and rolled back, which is how alternation
//! tries several branches at one position. The field log is shared
//! copy-on-write between the bucket and its snapshots: a save after a
//! snapshot copies the log first, so restoring can never observe a sibling
//! branch's saves.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::{debug, trace};
use tempora_chrono::{
    compare_reverse, ChronoError, Chronology, ChronologyRef, DateTimeField, DateTimeFieldType,
    DateTimeZone, DurationFieldType, Locale, PreciseField,
};

use crate::cache::TextLookupCache;
use crate::element::{FormatElement, TextLookup};
use crate::error::{FormatError, Result};

static NEXT_BUCKET_ID: AtomicU64 = AtomicU64::new(1);

/// Which field a saved value targets.
#[derive(Debug, Clone, PartialEq)]
enum SavedTarget {
    Chronology(DateTimeFieldType),
    Precise(PreciseField),
}

#[derive(Debug, Clone, PartialEq)]
enum SavedValue {
    Number(i32),
    Text { text: String, locale: Locale },
}

/// One parsed value waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
struct SavedField {
    target: SavedTarget,
    value: SavedValue,
}

impl SavedField {
    fn field<'a>(&'a self, chronology: &'a dyn Chronology) -> &'a dyn DateTimeField {
        match &self.target {
            SavedTarget::Chronology(field_type) => chronology.field(*field_type),
            SavedTarget::Precise(field) => field,
        }
    }

    fn set(&self, chronology: &dyn Chronology, millis: i64, reset: bool) -> std::result::Result<i64, ChronoError> {
        let field = self.field(chronology);
        let millis = match &self.value {
            SavedValue::Number(value) => field.set(millis, *value)?,
            SavedValue::Text { text, locale } => field.set_text(millis, text, locale)?,
        };
        trace!("applied {} = {:?} -> {millis}", field.field_type(), self.value);
        if reset {
            field.round_floor(millis)
        } else {
            Ok(millis)
        }
    }
}

/// Longer range first, then longer own duration.
fn compare_significance(chronology: &dyn Chronology, a: &SavedField, b: &SavedField) -> Ordering {
    let (a, b) = (a.field(chronology), b.field(chronology));
    compare_reverse(a.range_duration_field().as_ref(), b.range_duration_field().as_ref())
        .then_with(|| compare_reverse(Some(&a.duration_field()), Some(&b.duration_field())))
}

/// A rollback point taken by [`ParserBucket::save_state`].
///
/// Only the bucket that created a state can restore it.
#[derive(Debug, Clone)]
pub struct SavedState {
    owner: u64,
    zone: Option<DateTimeZone>,
    offset: Option<i32>,
    fields: Arc<Vec<SavedField>>,
    count: usize,
}

/// Mutable state for one parse: saved fields, a parsed zone or offset, and
/// the settings that steer resolution.
///
/// A bucket belongs to a single parse call. Reuse one with [`reset`].
///
/// [`reset`]: ParserBucket::reset
#[derive(Debug)]
pub struct ParserBucket {
    id: u64,
    chronology: ChronologyRef,
    millis: i64,
    default_zone: DateTimeZone,
    zone: Option<DateTimeZone>,
    offset: Option<i32>,
    locale: Locale,
    pivot_year: Option<i32>,
    default_year: i32,
    fields: Arc<Vec<SavedField>>,
    count: usize,
    text_cache: Option<Arc<TextLookupCache>>,
    local_lookups: HashMap<DateTimeFieldType, Option<Arc<TextLookup>>>,
}

impl ParserBucket {
    /// Creates a bucket that resolves onto `instant_local`.
    ///
    /// The chronology's zone becomes the default zone; fields are always
    /// applied in UTC.
    pub fn new(
        instant_local: i64,
        chronology: &ChronologyRef,
        locale: Locale,
        pivot_year: Option<i32>,
        default_year: i32,
    ) -> Self {
        let default_zone = chronology.zone();
        Self {
            id: NEXT_BUCKET_ID.fetch_add(1, AtomicOrdering::Relaxed),
            chronology: chronology.with_utc(),
            millis: instant_local,
            default_zone,
            zone: Some(default_zone),
            offset: None,
            locale,
            pivot_year,
            default_year,
            fields: Arc::new(Vec::new()),
            count: 0,
            text_cache: None,
            local_lookups: HashMap::new(),
        }
    }

    /// Shares text lookups with other parses through `cache`.
    pub fn with_text_cache(mut self, cache: Arc<TextLookupCache>) -> Self {
        self.text_cache = Some(cache);
        self
    }

    /// Clears saved fields, zone and offset so the bucket can parse again.
    pub fn reset(&mut self) {
        self.zone = Some(self.default_zone);
        self.offset = None;
        self.count = 0;
        if let Some(fields) = Arc::get_mut(&mut self.fields) {
            fields.clear();
        } else {
            self.fields = Arc::new(Vec::new());
        }
    }

    /// The UTC chronology fields are applied with.
    pub fn chronology(&self) -> &ChronologyRef {
        &self.chronology
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn zone(&self) -> Option<DateTimeZone> {
        self.zone
    }

    pub fn set_zone(&mut self, zone: DateTimeZone) {
        self.zone = Some(zone);
    }

    /// The parsed offset in millis, which takes precedence over the zone.
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Option<i32>) {
        self.offset = offset;
    }

    pub fn pivot_year(&self) -> Option<i32> {
        self.pivot_year
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    /// Number of fields saved so far.
    pub fn saved_field_count(&self) -> usize {
        self.count
    }

    pub fn save_field(&mut self, field_type: DateTimeFieldType, value: i32) {
        self.push(SavedField {
            target: SavedTarget::Chronology(field_type),
            value: SavedValue::Number(value),
        });
    }

    /// Saves text to be mapped to a value, in the bucket's locale, when the
    /// bucket resolves.
    pub fn save_field_text(&mut self, field_type: DateTimeFieldType, text: &str) {
        let locale = self.locale.clone();
        self.push(SavedField {
            target: SavedTarget::Chronology(field_type),
            value: SavedValue::Text {
                text: text.to_string(),
                locale,
            },
        });
    }

    /// Saves a value for a field the chronology does not name.
    pub fn save_precise(&mut self, field: PreciseField, value: i32) {
        self.push(SavedField {
            target: SavedTarget::Precise(field),
            value: SavedValue::Number(value),
        });
    }

    fn push(&mut self, field: SavedField) {
        let fields = Arc::make_mut(&mut self.fields);
        fields.truncate(self.count);
        fields.push(field);
        self.count += 1;
    }

    /// Every accepted rendering of `field_type` in the bucket's locale, or
    /// `None` when the field has no text form.
    pub fn text_lookup(&mut self, field_type: DateTimeFieldType) -> Option<Arc<TextLookup>> {
        if let Some(cache) = &self.text_cache {
            return cache.get_or_build(self.chronology.as_ref(), field_type, &self.locale);
        }
        self.local_lookups
            .entry(field_type)
            .or_insert_with(|| {
                TextLookup::build(self.chronology.as_ref(), field_type, &self.locale).map(Arc::new)
            })
            .clone()
    }

    pub fn save_state(&self) -> SavedState {
        SavedState {
            owner: self.id,
            zone: self.zone,
            offset: self.offset,
            fields: Arc::clone(&self.fields),
            count: self.count,
        }
    }

    /// Rolls back to `state`. Returns `false`, changing nothing, when the
    /// state came from another bucket.
    pub fn restore_state(&mut self, state: &SavedState) -> bool {
        if state.owner != self.id {
            return false;
        }
        self.zone = state.zone;
        self.offset = state.offset;
        self.fields = Arc::clone(&state.fields);
        self.count = state.count;
        true
    }

    /// Field types in the order resolution would apply them.
    pub fn resolution_order(&self) -> Vec<DateTimeFieldType> {
        let chronology = self.chronology.as_ref();
        self.sorted_fields()
            .iter()
            .map(|saved| saved.field(chronology).field_type())
            .collect()
    }

    fn sorted_fields(&self) -> Vec<SavedField> {
        let chronology = self.chronology.as_ref();
        let mut fields = self.fields[..self.count].to_vec();
        fields.sort_by(|a, b| compare_significance(chronology, a, b));
        fields
    }

    /// A month or day scale field leads the saved fields, so no year was
    /// parsed.
    fn lacks_year(&self, first: &SavedField) -> bool {
        let chronology = self.chronology.as_ref();
        let months = chronology.duration_field(DurationFieldType::Months);
        let days = chronology.duration_field(DurationFieldType::Days);
        let first = first.field(chronology).duration_field();
        compare_reverse(Some(&first), Some(&months)).is_ge()
            && compare_reverse(Some(&first), Some(&days)).is_le()
    }

    /// Applies the saved fields and converts the result to an instant.
    ///
    /// When `reset_fields` is set, each field is floored as it is applied
    /// and a second pass reapplies every field, flooring only the last, so
    /// no residue of the starting instant finer than the parsed fields
    /// survives. `text` is attached to error messages.
    ///
    /// # Errors
    /// `IllegalFieldValue` when a saved value is out of range and
    /// `IllegalInstant` when the local time falls in a zone transition gap.
    pub fn compute_millis(&mut self, reset_fields: bool, text: Option<&str>) -> Result<i64> {
        let mut fields = self.sorted_fields();
        if fields.first().is_some_and(|first| self.lacks_year(first)) {
            debug!("no year parsed, resolving with default year {}", self.default_year);
            self.save_field(DateTimeFieldType::Year, self.default_year);
            fields = self.sorted_fields();
        }

        let millis = self
            .apply(&fields, reset_fields)
            .map_err(|err| match (err, text) {
                (ChronoError::IllegalFieldValue(inner), Some(text)) => {
                    FormatError::IllegalFieldValue(inner.with_prefix(format!("Cannot parse \"{text}\"")))
                }
                (other, _) => other.into(),
            })?;

        if let Some(offset) = self.offset {
            return Ok(millis - i64::from(offset));
        }
        let Some(zone) = self.zone else {
            return Ok(millis);
        };
        let offset = zone.offset_from_local(millis);
        let instant = millis - i64::from(offset);
        if offset != zone.offset(instant) {
            return Err(FormatError::IllegalInstant {
                text: text.map(str::to_string),
                zone: zone.id(),
            });
        }
        Ok(instant)
    }

    fn apply(&self, fields: &[SavedField], reset_fields: bool) -> std::result::Result<i64, ChronoError> {
        let chronology = self.chronology.as_ref();
        let mut millis = self.millis;
        for saved in fields {
            millis = saved.set(chronology, millis, reset_fields)?;
        }
        if reset_fields {
            let last = fields.len().saturating_sub(1);
            for (i, saved) in fields.iter().enumerate() {
                millis = saved.set(chronology, millis, i == last)?;
            }
        }
        Ok(millis)
    }

    /// Resets the bucket, runs `parser` over the whole of `text` and
    /// resolves the result.
    ///
    /// # Errors
    /// `InvalidFormat` when the parser fails or leaves text unconsumed,
    /// otherwise the errors of [`compute_millis`](Self::compute_millis).
    pub fn parse_millis(&mut self, parser: &FormatElement, text: &str) -> Result<i64> {
        self.reset();
        match parser.parse(self, text, 0) {
            Ok(end) if end >= text.len() => self.compute_millis(true, Some(text)),
            Ok(end) | Err(end) => Err(FormatError::invalid_format(text, end)),
        }
    }
}
