//! An instant paired with the chronology (and so the zone) it is viewed in.

use std::fmt;

use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::chronology::ChronologyRef;
use crate::error::{ChronoError, Result};
use crate::field_type::DateTimeFieldType;
use crate::iso::{local_millis_to_naive, IsoChronology};
use crate::zone::DateTimeZone;

/// Milliseconds since 1970-01-01T00:00Z viewed through a chronology.
#[derive(Clone)]
pub struct DateTime {
    millis: i64,
    chronology: ChronologyRef,
}

impl DateTime {
    pub fn new(millis: i64, chronology: ChronologyRef) -> Self {
        Self { millis, chronology }
    }

    /// An ISO date-time in `zone`.
    pub fn in_zone(millis: i64, zone: DateTimeZone) -> Self {
        Self::new(millis, IsoChronology::shared(zone))
    }

    pub fn utc(millis: i64) -> Self {
        Self::in_zone(millis, DateTimeZone::UTC)
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    pub fn chronology(&self) -> &ChronologyRef {
        &self.chronology
    }

    pub fn zone(&self) -> DateTimeZone {
        self.chronology.zone()
    }

    /// Same instant, different zone.
    pub fn with_zone(&self, zone: DateTimeZone) -> Self {
        Self::new(self.millis, self.chronology.with_zone(zone))
    }

    pub fn with_millis(&self, millis: i64) -> Self {
        Self::new(millis, self.chronology.clone())
    }

    /// Millis shifted into the zone's wall-clock representation.
    pub fn local_millis(&self) -> i64 {
        let offset = self.zone().offset(self.millis);
        self.millis.saturating_add(i64::from(offset))
    }

    /// Reads one field in this value's zone.
    ///
    /// # Errors
    /// Fails when the instant lies outside the chronology's range.
    pub fn get(&self, field_type: DateTimeFieldType) -> Result<i32> {
        self.chronology.field(field_type).get(self.local_millis())
    }

    pub fn to_local_naive(&self) -> Result<NaiveDateTime> {
        local_millis_to_naive(self.local_millis())
    }

    pub fn to_utc(&self) -> Result<chrono::DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.millis)
            .single()
            .ok_or(ChronoError::InstantOutOfRange(self.millis))
    }

    pub fn from_utc(value: &chrono::DateTime<Utc>) -> Self {
        Self::utc(value.timestamp_millis())
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
            && self.zone() == other.zone()
            && self.chronology.name() == other.chronology.name()
    }
}

impl Eq for DateTime {}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTime")
            .field("millis", &self.millis)
            .field("chronology", &self.chronology.name())
            .field("zone", &self.zone().id())
            .finish()
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::from_utc(&value)
    }
}
