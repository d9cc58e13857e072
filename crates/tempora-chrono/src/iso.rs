//! The ISO-8601 chronology: proleptic Gregorian dates, weeks starting on
//! Monday, week-based years per ISO-8601.
//!
//! Date arithmetic is delegated to `chrono::NaiveDate`; time-of-day fields
//! are plain millisecond arithmetic.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::chronology::{Chronology, ChronologyRef, DateTimeField};
use crate::error::{ChronoError, IllegalFieldValue, Result};
use crate::field_type::{
    DateTimeFieldType, DurationField, DurationFieldType, MILLIS_PER_DAY, MILLIS_PER_HALFDAY,
    MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_MONTH, MILLIS_PER_SECOND, MILLIS_PER_WEEK,
    MILLIS_PER_YEAR,
};
use crate::locale::Locale;
use crate::zone::DateTimeZone;

/// Smallest year the ISO fields accept.
pub const MIN_YEAR: i32 = -262_143;
/// Largest year the ISO fields accept.
pub const MAX_YEAR: i32 = 262_142;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// The ISO calendar in a given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IsoChronology {
    zone: DateTimeZone,
}

impl IsoChronology {
    pub const fn new(zone: DateTimeZone) -> Self {
        Self { zone }
    }

    pub const fn utc() -> Self {
        Self::new(DateTimeZone::UTC)
    }

    /// A shared handle for `zone`.
    pub fn shared(zone: DateTimeZone) -> ChronologyRef {
        Arc::new(Self::new(zone))
    }

    pub fn shared_utc() -> ChronologyRef {
        Self::shared(DateTimeZone::UTC)
    }
}

impl Chronology for IsoChronology {
    fn name(&self) -> &'static str {
        "ISO"
    }

    fn zone(&self) -> DateTimeZone {
        self.zone
    }

    fn with_zone(&self, zone: DateTimeZone) -> ChronologyRef {
        Self::shared(zone)
    }

    fn field(&self, field_type: DateTimeFieldType) -> &dyn DateTimeField {
        &ISO_FIELDS[field_type.index()]
    }

    fn duration_field(&self, duration_type: DurationFieldType) -> DurationField {
        iso_duration(duration_type)
    }
}

static ISO_FIELDS: [IsoField; 23] = iso_fields();

const fn iso_fields() -> [IsoField; 23] {
    let mut fields = [IsoField(DateTimeFieldType::Era); 23];
    let mut i = 0;
    while i < fields.len() {
        fields[i] = IsoField(DateTimeFieldType::ALL[i]);
        i += 1;
    }
    fields
}

fn iso_duration(duration_type: DurationFieldType) -> DurationField {
    use DurationFieldType as D;
    match duration_type {
        D::Eras => DurationField::unsupported(D::Eras),
        D::Centuries => DurationField::new(D::Centuries, 100 * MILLIS_PER_YEAR, false),
        D::Weekyears => DurationField::new(D::Weekyears, MILLIS_PER_YEAR, false),
        D::Years => DurationField::new(D::Years, MILLIS_PER_YEAR, false),
        D::Months => DurationField::new(D::Months, MILLIS_PER_MONTH, false),
        D::Weeks => DurationField::new(D::Weeks, MILLIS_PER_WEEK, true),
        D::Days => DurationField::new(D::Days, MILLIS_PER_DAY, true),
        D::Halfdays => DurationField::new(D::Halfdays, MILLIS_PER_HALFDAY, true),
        D::Hours => DurationField::new(D::Hours, MILLIS_PER_HOUR, true),
        D::Minutes => DurationField::new(D::Minutes, MILLIS_PER_MINUTE, true),
        D::Seconds => DurationField::new(D::Seconds, MILLIS_PER_SECOND, true),
        D::Millis => DurationField::millis(),
    }
}

/// Converts a naive date-time to local millis.
pub fn naive_to_local_millis(value: &NaiveDateTime) -> i64 {
    join(value.date(), millis_of_day(&value.time()))
}

/// Converts local millis to a naive date-time.
///
/// # Errors
/// Returns `ChronoError::InstantOutOfRange` outside chrono's date range.
pub fn local_millis_to_naive(local: i64) -> Result<NaiveDateTime> {
    let (date, millis) = split(local)?;
    // millis is within a day, so both casts are lossless.
    let seconds = (millis / MILLIS_PER_SECOND) as u32;
    let nanos = (millis % MILLIS_PER_SECOND) as u32 * 1_000_000;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
        .ok_or(ChronoError::InstantOutOfRange(local))?;
    Ok(date.and_time(time))
}

pub(crate) fn millis_of_day(time: &NaiveTime) -> i64 {
    let millis = time.nanosecond().min(999_999_999) / 1_000_000;
    i64::from(time.num_seconds_from_midnight()) * MILLIS_PER_SECOND + i64::from(millis)
}

fn split(instant: i64) -> Result<(NaiveDate, i64)> {
    let days = instant.div_euclid(MILLIS_PER_DAY);
    let millis = instant.rem_euclid(MILLIS_PER_DAY);
    let date = i32::try_from(days + EPOCH_DAYS_FROM_CE)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(ChronoError::InstantOutOfRange(instant))?;
    Ok((date, millis))
}

fn join(date: NaiveDate, millis: i64) -> i64 {
    (i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE) * MILLIS_PER_DAY + millis
}

fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Dec 28 always falls in the last ISO week of its year.
fn weeks_in_weekyear(weekyear: i32) -> i32 {
    NaiveDate::from_ymd_opt(weekyear, 12, 28)
        .map(|d| d.iso_week().week() as i32)
        .unwrap_or(52)
}

fn year_of_era(year: i32) -> i32 {
    if year > 0 {
        year
    } else {
        1 - year
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ChronoError::InstantOutOfRange(i64::from(year)))
}

fn with_year(date: NaiveDate, year: i32) -> Result<NaiveDate> {
    let day = date.day().min(days_in_month(year, date.month()));
    ymd(year, date.month(), day)
}

fn with_weekyear(date: NaiveDate, weekyear: i32) -> Result<NaiveDate> {
    let week = date.iso_week();
    if week.year() == weekyear {
        return Ok(date);
    }
    let max_week = weeks_in_weekyear(weekyear).min(weeks_in_weekyear(week.year()));
    let target = (week.week() as i32).min(max_week) as u32;
    NaiveDate::from_isoywd_opt(weekyear, target, date.weekday())
        .ok_or(ChronoError::InstantOutOfRange(i64::from(weekyear)))
}

fn with_year_of_era(date: NaiveDate, yoe: i32) -> Result<NaiveDate> {
    if yoe < 1 {
        return Err(IllegalFieldValue::out_of_range(
            DateTimeFieldType::YearOfEra,
            i64::from(yoe),
            1,
            i64::from(MAX_YEAR),
        )
        .into());
    }
    with_year(date, if date.year() > 0 { yoe } else { 1 - yoe })
}

fn is_time_of_day(field_type: DateTimeFieldType) -> bool {
    use DateTimeFieldType as F;
    matches!(
        field_type,
        F::HalfdayOfDay
            | F::HourOfHalfday
            | F::ClockhourOfHalfday
            | F::ClockhourOfDay
            | F::HourOfDay
            | F::MinuteOfDay
            | F::MinuteOfHour
            | F::SecondOfDay
            | F::SecondOfMinute
            | F::MillisOfDay
            | F::MillisOfSecond
    )
}

/// Value of a time-of-day field from millis within the day.
fn time_of_day_value(field_type: DateTimeFieldType, millis: i64) -> i64 {
    use DateTimeFieldType as F;
    match field_type {
        F::HalfdayOfDay => millis / MILLIS_PER_HALFDAY,
        F::HourOfHalfday => (millis / MILLIS_PER_HOUR) % 12,
        F::ClockhourOfHalfday => match (millis / MILLIS_PER_HOUR) % 12 {
            0 => 12,
            hour => hour,
        },
        F::ClockhourOfDay => match millis / MILLIS_PER_HOUR {
            0 => 24,
            hour => hour,
        },
        F::HourOfDay => millis / MILLIS_PER_HOUR,
        F::MinuteOfDay => millis / MILLIS_PER_MINUTE,
        F::MinuteOfHour => (millis / MILLIS_PER_MINUTE) % 60,
        F::SecondOfDay => millis / MILLIS_PER_SECOND,
        F::SecondOfMinute => (millis / MILLIS_PER_SECOND) % 60,
        F::MillisOfSecond => millis % MILLIS_PER_SECOND,
        _ => millis,
    }
}

#[derive(Debug, Clone, Copy)]
struct IsoField(DateTimeFieldType);

impl IsoField {
    /// Legal bounds at `instant`; only day and week fields vary.
    fn bounds_at(&self, instant: i64) -> Result<(i32, i32)> {
        use DateTimeFieldType as F;
        let max = match self.0 {
            F::DayOfMonth => {
                let (date, _) = split(instant)?;
                days_in_month(date.year(), date.month()) as i32
            }
            F::DayOfYear => days_in_year(split(instant)?.0.year()),
            F::WeekOfWeekyear => weeks_in_weekyear(split(instant)?.0.iso_week().year()),
            _ => self.maximum_value(),
        };
        Ok((self.minimum_value(), max))
    }

    /// Text table and the value of its first entry.
    fn texts(&self, locale: &Locale, short: bool) -> Option<(&'static [&'static str], i32)> {
        use DateTimeFieldType as F;
        let symbols = locale.symbols();
        match (self.0, short) {
            (F::Era, _) => Some((&symbols.eras[..], 0)),
            (F::MonthOfYear, false) => Some((&symbols.months[..], 1)),
            (F::MonthOfYear, true) => Some((&symbols.short_months[..], 1)),
            (F::DayOfWeek, false) => Some((&symbols.weekdays[..], 1)),
            (F::DayOfWeek, true) => Some((&symbols.short_weekdays[..], 1)),
            (F::HalfdayOfDay, _) => Some((&symbols.halfdays[..], 0)),
            _ => None,
        }
    }

    fn text_for(&self, value: i32, locale: &Locale, short: bool) -> String {
        self.texts(locale, short)
            .and_then(|(table, base)| usize::try_from(value - base).ok().and_then(|i| table.get(i)))
            .map(|text| text.to_string())
            .unwrap_or_else(|| value.to_string())
    }

    fn longest_text(&self, locale: &Locale, short: bool) -> Option<usize> {
        self.texts(locale, short)
            .map(|(table, _)| table.iter().map(|t| t.chars().count()).max().unwrap_or(0))
    }
}

impl DateTimeField for IsoField {
    fn field_type(&self) -> DateTimeFieldType {
        self.0
    }

    fn get(&self, instant: i64) -> Result<i32> {
        use DateTimeFieldType as F;
        if is_time_of_day(self.0) {
            let millis = instant.rem_euclid(MILLIS_PER_DAY);
            // Bounded by MILLIS_PER_DAY.
            return Ok(time_of_day_value(self.0, millis) as i32);
        }
        let (date, _) = split(instant)?;
        let value = match self.0 {
            F::Era => i32::from(date.year() > 0),
            F::YearOfEra => year_of_era(date.year()),
            F::CenturyOfEra => year_of_era(date.year()) / 100,
            F::YearOfCentury => year_of_era(date.year()) % 100,
            F::Year => date.year(),
            F::DayOfYear => date.ordinal() as i32,
            F::MonthOfYear => date.month() as i32,
            F::DayOfMonth => date.day() as i32,
            F::WeekyearOfCentury => date.iso_week().year().rem_euclid(100),
            F::Weekyear => date.iso_week().year(),
            F::WeekOfWeekyear => date.iso_week().week() as i32,
            _ => date.weekday().number_from_monday() as i32,
        };
        Ok(value)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        use DateTimeFieldType as F;
        let (min, max) = self.bounds_at(instant)?;
        if value < min || value > max {
            return Err(IllegalFieldValue::out_of_range(
                self.0,
                i64::from(value),
                i64::from(min),
                i64::from(max),
            )
            .into());
        }
        if is_time_of_day(self.0) {
            let (base, value, unit) = match self.0 {
                F::ClockhourOfHalfday => (F::HourOfHalfday, value % 12, MILLIS_PER_HOUR),
                F::ClockhourOfDay => (F::HourOfDay, value % 24, MILLIS_PER_HOUR),
                F::HalfdayOfDay => (self.0, value, MILLIS_PER_HALFDAY),
                F::HourOfHalfday | F::HourOfDay => (self.0, value, MILLIS_PER_HOUR),
                F::MinuteOfDay | F::MinuteOfHour => (self.0, value, MILLIS_PER_MINUTE),
                F::SecondOfDay | F::SecondOfMinute => (self.0, value, MILLIS_PER_SECOND),
                _ => (self.0, value, 1),
            };
            let current = time_of_day_value(base, instant.rem_euclid(MILLIS_PER_DAY));
            return Ok(instant + (i64::from(value) - current) * unit);
        }
        let (date, millis) = split(instant)?;
        let date = match self.0 {
            F::Era if i32::from(date.year() > 0) == value => date,
            F::Era => with_year(date, 1 - date.year())?,
            F::YearOfEra => with_year_of_era(date, value)?,
            F::CenturyOfEra => {
                with_year_of_era(date, value * 100 + year_of_era(date.year()) % 100)?
            }
            F::YearOfCentury => {
                with_year_of_era(date, year_of_era(date.year()) / 100 * 100 + value)?
            }
            F::Year => with_year(date, value)?,
            F::DayOfYear => NaiveDate::from_yo_opt(date.year(), value as u32)
                .ok_or(ChronoError::InstantOutOfRange(instant))?,
            F::MonthOfYear => {
                let month = value as u32;
                let day = date.day().min(days_in_month(date.year(), month));
                ymd(date.year(), month, day)?
            }
            F::DayOfMonth => ymd(date.year(), date.month(), value as u32)?,
            F::WeekyearOfCentury => {
                let century = date.iso_week().year().div_euclid(100);
                with_weekyear(date, century * 100 + value)?
            }
            F::Weekyear => with_weekyear(date, value)?,
            F::WeekOfWeekyear => {
                NaiveDate::from_isoywd_opt(date.iso_week().year(), value as u32, date.weekday())
                    .ok_or(ChronoError::InstantOutOfRange(instant))?
            }
            _ => {
                let current = date.weekday().number_from_monday() as i32;
                return Ok(instant + i64::from(value - current) * MILLIS_PER_DAY);
            }
        };
        Ok(join(date, millis))
    }

    fn value_from_text(&self, text: &str, locale: &Locale) -> Result<i32> {
        use DateTimeFieldType as F;
        let Some((long, base)) = self.texts(locale, false) else {
            return text
                .parse::<i32>()
                .map_err(|_| IllegalFieldValue::unsupported_text(self.0, text).into());
        };
        let wanted = text.to_lowercase();
        let short = self.texts(locale, true).map(|(t, _)| t).unwrap_or(long);
        for table in [long, short] {
            if let Some(i) = table.iter().position(|t| t.to_lowercase() == wanted) {
                return Ok(base + i as i32);
            }
        }
        if self.0 == F::Era && locale.language() == "en" {
            match wanted.as_str() {
                "bce" => return Ok(0),
                "ce" => return Ok(1),
                _ => {}
            }
        }
        Err(IllegalFieldValue::unsupported_text(self.0, text).into())
    }

    fn as_text(&self, value: i32, locale: &Locale) -> String {
        self.text_for(value, locale, false)
    }

    fn as_short_text(&self, value: i32, locale: &Locale) -> String {
        self.text_for(value, locale, true)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        use DateTimeFieldType as F;
        if is_time_of_day(self.0) {
            let unit = self.duration_field().unit_millis();
            return Ok(instant - instant.rem_euclid(unit));
        }
        let (date, _) = split(instant)?;
        let floor = match self.0 {
            F::Era if date.year() > 0 => ymd(1, 1, 1)?,
            F::Era => NaiveDate::MIN,
            F::CenturyOfEra => {
                let yoe = year_of_era(date.year());
                if date.year() > 0 {
                    ymd((yoe / 100 * 100).max(1), 1, 1)?
                } else {
                    ymd(1 - (yoe / 100 * 100 + 99), 1, 1)?
                }
            }
            F::YearOfEra | F::YearOfCentury | F::Year => ymd(date.year(), 1, 1)?,
            F::MonthOfYear => ymd(date.year(), date.month(), 1)?,
            F::WeekyearOfCentury | F::Weekyear => {
                NaiveDate::from_isoywd_opt(date.iso_week().year(), 1, Weekday::Mon)
                    .ok_or(ChronoError::InstantOutOfRange(instant))?
            }
            F::WeekOfWeekyear => {
                let week = date.iso_week();
                NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon)
                    .ok_or(ChronoError::InstantOutOfRange(instant))?
            }
            _ => date,
        };
        Ok(join(floor, 0))
    }

    fn duration_field(&self) -> DurationField {
        iso_duration(self.0.duration_type())
    }

    fn range_duration_field(&self) -> Option<DurationField> {
        self.0.range_duration_type().map(iso_duration)
    }

    fn minimum_value(&self) -> i32 {
        use DateTimeFieldType as F;
        match self.0 {
            F::YearOfEra
            | F::DayOfYear
            | F::MonthOfYear
            | F::DayOfMonth
            | F::WeekOfWeekyear
            | F::DayOfWeek
            | F::ClockhourOfHalfday
            | F::ClockhourOfDay => 1,
            F::Year | F::Weekyear => MIN_YEAR,
            _ => 0,
        }
    }

    fn maximum_value(&self) -> i32 {
        use DateTimeFieldType as F;
        match self.0 {
            F::Era | F::HalfdayOfDay => 1,
            F::YearOfEra | F::Year | F::Weekyear => MAX_YEAR,
            F::CenturyOfEra => MAX_YEAR / 100,
            F::YearOfCentury | F::WeekyearOfCentury => 99,
            F::DayOfYear => 366,
            F::MonthOfYear => 12,
            F::DayOfMonth => 31,
            F::WeekOfWeekyear => 53,
            F::DayOfWeek => 7,
            F::HourOfHalfday => 11,
            F::ClockhourOfHalfday => 12,
            F::ClockhourOfDay => 24,
            F::HourOfDay => 23,
            F::MinuteOfDay => 1439,
            F::MinuteOfHour | F::SecondOfMinute => 59,
            F::SecondOfDay => 86_399,
            F::MillisOfDay => 86_399_999,
            F::MillisOfSecond => 999,
        }
    }

    fn maximum_text_length(&self, locale: &Locale) -> usize {
        match self.longest_text(locale, false) {
            Some(len) => len,
            None => default_text_length(self),
        }
    }

    fn maximum_short_text_length(&self, locale: &Locale) -> usize {
        match self.longest_text(locale, true) {
            Some(len) => len,
            None => default_text_length(self),
        }
    }
}

fn default_text_length(field: &IsoField) -> usize {
    let digits = |v: i32| v.unsigned_abs().to_string().len() + usize::from(v < 0);
    digits(field.minimum_value()).max(digits(field.maximum_value()))
}
