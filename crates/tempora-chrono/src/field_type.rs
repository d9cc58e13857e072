//! Field and duration identifiers, plus the duration metadata used to rank
//! fields against each other.
//!
//! A [`DateTimeFieldType`] names a calendar field (`monthOfYear`, `hourOfDay`,
//! ...). Every field has an *own* duration (the unit one step of the field
//! spans) and usually a *range* duration (the unit it resets within):
//! `dayOfMonth` steps in days and resets every month. `year` has no range.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Average Gregorian year (365.2425 days).
pub const MILLIS_PER_YEAR: i64 = 31_556_952_000;
/// Average Gregorian month (a twelfth of [`MILLIS_PER_YEAR`]).
pub const MILLIS_PER_MONTH: i64 = 2_629_746_000;
pub const MILLIS_PER_WEEK: i64 = 604_800_000;
pub const MILLIS_PER_DAY: i64 = 86_400_000;
pub const MILLIS_PER_HALFDAY: i64 = 43_200_000;
pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_MINUTE: i64 = 60_000;
pub const MILLIS_PER_SECOND: i64 = 1_000;

/// Identifies a unit of time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum DurationFieldType {
    Eras,
    Centuries,
    Weekyears,
    Years,
    Months,
    Weeks,
    Days,
    Halfdays,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl DurationFieldType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eras => "eras",
            Self::Centuries => "centuries",
            Self::Weekyears => "weekyears",
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Halfdays => "halfdays",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Millis => "millis",
        }
    }
}

impl fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a calendar field.
///
/// The declaration order runs from the most to the least significant field,
/// which is also the order [`DateTimeFieldType::ALL`] lists them in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum DateTimeFieldType {
    Era,
    YearOfEra,
    CenturyOfEra,
    YearOfCentury,
    Year,
    DayOfYear,
    MonthOfYear,
    DayOfMonth,
    WeekyearOfCentury,
    Weekyear,
    WeekOfWeekyear,
    DayOfWeek,
    HalfdayOfDay,
    HourOfHalfday,
    ClockhourOfHalfday,
    ClockhourOfDay,
    HourOfDay,
    MinuteOfDay,
    MinuteOfHour,
    SecondOfDay,
    SecondOfMinute,
    MillisOfDay,
    MillisOfSecond,
}

impl DateTimeFieldType {
    pub const ALL: [DateTimeFieldType; 23] = [
        Self::Era,
        Self::YearOfEra,
        Self::CenturyOfEra,
        Self::YearOfCentury,
        Self::Year,
        Self::DayOfYear,
        Self::MonthOfYear,
        Self::DayOfMonth,
        Self::WeekyearOfCentury,
        Self::Weekyear,
        Self::WeekOfWeekyear,
        Self::DayOfWeek,
        Self::HalfdayOfDay,
        Self::HourOfHalfday,
        Self::ClockhourOfHalfday,
        Self::ClockhourOfDay,
        Self::HourOfDay,
        Self::MinuteOfDay,
        Self::MinuteOfHour,
        Self::SecondOfDay,
        Self::SecondOfMinute,
        Self::MillisOfDay,
        Self::MillisOfSecond,
    ];

    /// Position of this field in [`DateTimeFieldType::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Era => "era",
            Self::YearOfEra => "yearOfEra",
            Self::CenturyOfEra => "centuryOfEra",
            Self::YearOfCentury => "yearOfCentury",
            Self::Year => "year",
            Self::DayOfYear => "dayOfYear",
            Self::MonthOfYear => "monthOfYear",
            Self::DayOfMonth => "dayOfMonth",
            Self::WeekyearOfCentury => "weekyearOfCentury",
            Self::Weekyear => "weekyear",
            Self::WeekOfWeekyear => "weekOfWeekyear",
            Self::DayOfWeek => "dayOfWeek",
            Self::HalfdayOfDay => "halfdayOfDay",
            Self::HourOfHalfday => "hourOfHalfday",
            Self::ClockhourOfHalfday => "clockhourOfHalfday",
            Self::ClockhourOfDay => "clockhourOfDay",
            Self::HourOfDay => "hourOfDay",
            Self::MinuteOfDay => "minuteOfDay",
            Self::MinuteOfHour => "minuteOfHour",
            Self::SecondOfDay => "secondOfDay",
            Self::SecondOfMinute => "secondOfMinute",
            Self::MillisOfDay => "millisOfDay",
            Self::MillisOfSecond => "millisOfSecond",
        }
    }

    /// The unit one step of this field spans.
    pub const fn duration_type(self) -> DurationFieldType {
        use DurationFieldType as D;
        match self {
            Self::Era => D::Eras,
            Self::CenturyOfEra => D::Centuries,
            Self::YearOfEra | Self::YearOfCentury | Self::Year => D::Years,
            Self::WeekyearOfCentury | Self::Weekyear => D::Weekyears,
            Self::MonthOfYear => D::Months,
            Self::WeekOfWeekyear => D::Weeks,
            Self::DayOfYear | Self::DayOfMonth | Self::DayOfWeek => D::Days,
            Self::HalfdayOfDay => D::Halfdays,
            Self::HourOfHalfday
            | Self::ClockhourOfHalfday
            | Self::ClockhourOfDay
            | Self::HourOfDay => D::Hours,
            Self::MinuteOfDay | Self::MinuteOfHour => D::Minutes,
            Self::SecondOfDay | Self::SecondOfMinute => D::Seconds,
            Self::MillisOfDay | Self::MillisOfSecond => D::Millis,
        }
    }

    /// The unit this field resets within, or `None` for unbounded fields
    /// such as `year` and `era`.
    pub const fn range_duration_type(self) -> Option<DurationFieldType> {
        use DurationFieldType as D;
        match self {
            Self::Era | Self::Year | Self::Weekyear => None,
            Self::YearOfEra | Self::CenturyOfEra => Some(D::Eras),
            Self::YearOfCentury | Self::WeekyearOfCentury => Some(D::Centuries),
            Self::WeekOfWeekyear => Some(D::Weekyears),
            Self::DayOfYear | Self::MonthOfYear => Some(D::Years),
            Self::DayOfMonth => Some(D::Months),
            Self::DayOfWeek => Some(D::Weeks),
            Self::HalfdayOfDay
            | Self::ClockhourOfDay
            | Self::HourOfDay
            | Self::MinuteOfDay
            | Self::SecondOfDay
            | Self::MillisOfDay => Some(D::Days),
            Self::HourOfHalfday | Self::ClockhourOfHalfday => Some(D::Halfdays),
            Self::MinuteOfHour => Some(D::Hours),
            Self::SecondOfMinute => Some(D::Minutes),
            Self::MillisOfSecond => Some(D::Seconds),
        }
    }
}

impl fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Length metadata for one unit of a field.
///
/// Imprecise units (months, years) carry their average length, which is only
/// good for ordering, never for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationField {
    field_type: DurationFieldType,
    unit_millis: i64,
    precise: bool,
    supported: bool,
}

impl DurationField {
    pub const fn new(field_type: DurationFieldType, unit_millis: i64, precise: bool) -> Self {
        Self {
            field_type,
            unit_millis,
            precise,
            supported: true,
        }
    }

    /// A unit the calendar does not measure (eras in ISO).
    pub const fn unsupported(field_type: DurationFieldType) -> Self {
        Self {
            field_type,
            unit_millis: 0,
            precise: true,
            supported: false,
        }
    }

    pub const fn millis() -> Self {
        Self::new(DurationFieldType::Millis, 1, true)
    }

    pub const fn field_type(&self) -> DurationFieldType {
        self.field_type
    }

    pub const fn unit_millis(&self) -> i64 {
        self.unit_millis
    }

    pub const fn is_precise(&self) -> bool {
        self.precise
    }

    pub const fn is_supported(&self) -> bool {
        self.supported
    }

    /// Compares unit lengths, shorter first.
    pub fn compare_units(&self, other: &DurationField) -> Ordering {
        self.unit_millis.cmp(&other.unit_millis)
    }
}

/// Orders two duration fields longest first.
///
/// A missing or unsupported field counts as infinitely long, so it sorts
/// ahead of every real unit; two such fields compare equal.
pub fn compare_reverse(a: Option<&DurationField>, b: Option<&DurationField>) -> Ordering {
    let a = a.filter(|f| f.is_supported());
    let b = b.filter(|f| f.is_supported());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.compare_units(a),
    }
}
