//! Values that carry only some calendar fields.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::chronology::{Chronology, ChronologyRef};
use crate::field_type::DateTimeFieldType;
use crate::iso::{millis_of_day, naive_to_local_millis, IsoChronology};

/// Read access to a value that knows only some of its fields.
pub trait ReadablePartial {
    fn chronology(&self) -> ChronologyRef;

    /// Fields this value carries, most significant first.
    fn field_types(&self) -> Vec<DateTimeFieldType>;

    /// The value of `field_type`, or `None` when it cannot be derived.
    fn get(&self, field_type: DateTimeFieldType) -> Option<i32>;

    fn is_supported(&self, field_type: DateTimeFieldType) -> bool {
        self.get(field_type).is_some()
    }
}

/// An explicit set of field values, e.g. just a month and a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partial {
    values: BTreeMap<DateTimeFieldType, i32>,
}

impl Partial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `field_type` set to `value`.
    pub fn with(mut self, field_type: DateTimeFieldType, value: i32) -> Self {
        self.values.insert(field_type, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(DateTimeFieldType, i32)> for Partial {
    fn from_iter<I: IntoIterator<Item = (DateTimeFieldType, i32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ReadablePartial for Partial {
    fn chronology(&self) -> ChronologyRef {
        IsoChronology::shared_utc()
    }

    fn field_types(&self) -> Vec<DateTimeFieldType> {
        self.values.keys().copied().collect()
    }

    fn get(&self, field_type: DateTimeFieldType) -> Option<i32> {
        self.values.get(&field_type).copied()
    }
}

const DATE_FIELDS: [DateTimeFieldType; 3] = [
    DateTimeFieldType::Year,
    DateTimeFieldType::MonthOfYear,
    DateTimeFieldType::DayOfMonth,
];

const TIME_FIELDS: [DateTimeFieldType; 4] = [
    DateTimeFieldType::HourOfDay,
    DateTimeFieldType::MinuteOfHour,
    DateTimeFieldType::SecondOfMinute,
    DateTimeFieldType::MillisOfSecond,
];

fn is_date_field(field_type: DateTimeFieldType) -> bool {
    field_type < DateTimeFieldType::HalfdayOfDay
}

/// Reads `field_type` from the ISO field at `local` millis.
fn iso_value(field_type: DateTimeFieldType, local: i64) -> Option<i32> {
    IsoChronology::utc().field(field_type).get(local).ok()
}

impl ReadablePartial for NaiveDate {
    fn chronology(&self) -> ChronologyRef {
        IsoChronology::shared_utc()
    }

    fn field_types(&self) -> Vec<DateTimeFieldType> {
        DATE_FIELDS.to_vec()
    }

    fn get(&self, field_type: DateTimeFieldType) -> Option<i32> {
        if !is_date_field(field_type) {
            return None;
        }
        iso_value(field_type, naive_to_local_millis(&self.and_time(NaiveTime::MIN)))
    }
}

impl ReadablePartial for NaiveTime {
    fn chronology(&self) -> ChronologyRef {
        IsoChronology::shared_utc()
    }

    fn field_types(&self) -> Vec<DateTimeFieldType> {
        TIME_FIELDS.to_vec()
    }

    fn get(&self, field_type: DateTimeFieldType) -> Option<i32> {
        if is_date_field(field_type) {
            return None;
        }
        iso_value(field_type, millis_of_day(self))
    }
}

impl ReadablePartial for NaiveDateTime {
    fn chronology(&self) -> ChronologyRef {
        IsoChronology::shared_utc()
    }

    fn field_types(&self) -> Vec<DateTimeFieldType> {
        DATE_FIELDS.iter().chain(TIME_FIELDS.iter()).copied().collect()
    }

    fn get(&self, field_type: DateTimeFieldType) -> Option<i32> {
        iso_value(field_type, naive_to_local_millis(self))
    }
}
