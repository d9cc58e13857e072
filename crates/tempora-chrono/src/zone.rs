//! Time zones: fixed offsets and IANA zones from `chrono-tz`.
//!
//! All offsets are in milliseconds, positive east of Greenwich. Local millis
//! are `instant + offset`, the zone-agnostic representation the calendar
//! fields operate on.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetName, Tz};

use crate::error::{ChronoError, Result};
use crate::field_type::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

const MAX_OFFSET_MILLIS: i64 = 24 * MILLIS_PER_HOUR - 1;

/// A time zone: either a constant offset or a named region with rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeZone {
    /// A constant offset in milliseconds. Zero is UTC.
    Fixed(i32),
    /// A region from the IANA database.
    Named(Tz),
}

/// Short names recognised when parsing zone names, as `(name, zone)`.
pub const DEFAULT_ZONE_NAMES: [(&str, DateTimeZone); 11] = [
    ("UT", DateTimeZone::UTC),
    ("UTC", DateTimeZone::UTC),
    ("GMT", DateTimeZone::UTC),
    ("EST", DateTimeZone::Named(chrono_tz::America::New_York)),
    ("EDT", DateTimeZone::Named(chrono_tz::America::New_York)),
    ("CST", DateTimeZone::Named(chrono_tz::America::Chicago)),
    ("CDT", DateTimeZone::Named(chrono_tz::America::Chicago)),
    ("MST", DateTimeZone::Named(chrono_tz::America::Denver)),
    ("MDT", DateTimeZone::Named(chrono_tz::America::Denver)),
    ("PST", DateTimeZone::Named(chrono_tz::America::Los_Angeles)),
    ("PDT", DateTimeZone::Named(chrono_tz::America::Los_Angeles)),
];

impl DateTimeZone {
    pub const UTC: DateTimeZone = DateTimeZone::Fixed(0);

    /// A fixed zone for the given offset.
    ///
    /// # Errors
    /// Returns `ChronoError::OffsetOutOfRange` beyond ±23:59:59.999.
    pub fn for_offset_millis(offset: i32) -> Result<Self> {
        if i64::from(offset).abs() > MAX_OFFSET_MILLIS {
            return Err(ChronoError::OffsetOutOfRange(i64::from(offset)));
        }
        Ok(DateTimeZone::Fixed(offset))
    }

    /// Looks up a zone by id: `UTC`, a signed offset such as `+05:30`, or an
    /// IANA id such as `Europe/Paris`.
    ///
    /// # Errors
    /// Returns `ChronoError::UnknownZone` if the id is not recognised.
    pub fn for_id(id: &str) -> Result<Self> {
        if id == "UTC" || id == "Etc/UTC" {
            return Ok(DateTimeZone::UTC);
        }
        if id.starts_with('+') || id.starts_with('-') {
            let offset =
                parse_offset(id).ok_or_else(|| ChronoError::UnknownZone(id.to_string()))?;
            return Self::for_offset_millis(offset);
        }
        id.parse::<Tz>()
            .map(DateTimeZone::Named)
            .map_err(|_| ChronoError::UnknownZone(id.to_string()))
    }

    /// Every named id the zone database knows.
    pub fn available_ids() -> impl Iterator<Item = &'static str> {
        chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name())
    }

    pub fn id(&self) -> String {
        match self {
            DateTimeZone::Fixed(0) => "UTC".to_string(),
            DateTimeZone::Fixed(offset) => print_offset(*offset),
            DateTimeZone::Named(tz) => tz.name().to_string(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, DateTimeZone::Fixed(_))
    }

    /// Offset to add to `instant` to get local millis.
    pub fn offset(&self, instant: i64) -> i32 {
        match self {
            DateTimeZone::Fixed(offset) => *offset,
            DateTimeZone::Named(tz) => {
                let utc = naive_from_millis(instant);
                seconds_to_millis(tz.offset_from_utc_datetime(&utc).fix().local_minus_utc())
            }
        }
    }

    /// Offset to subtract from local millis to get an instant.
    ///
    /// When the local time occurs twice the earlier instant's offset is
    /// returned. When it falls in a gap the returned offset does not survive
    /// the round trip, i.e. `offset(local - result) != result`, which callers
    /// use to detect the gap.
    pub fn offset_from_local(&self, local: i64) -> i32 {
        match self {
            DateTimeZone::Fixed(offset) => *offset,
            DateTimeZone::Named(tz) => {
                let naive = naive_from_millis(local);
                match tz.offset_from_local_datetime(&naive) {
                    LocalResult::Single(offset) => seconds_to_millis(offset.fix().local_minus_utc()),
                    LocalResult::Ambiguous(earlier, _) => {
                        seconds_to_millis(earlier.fix().local_minus_utc())
                    }
                    LocalResult::None => {
                        let guess = self.offset(local);
                        self.offset(local.saturating_sub(i64::from(guess)))
                    }
                }
            }
        }
    }

    /// Abbreviated display name at `instant`, e.g. `PST`.
    pub fn short_name(&self, instant: i64) -> String {
        match self {
            DateTimeZone::Fixed(_) => self.id(),
            DateTimeZone::Named(tz) => {
                let utc = naive_from_millis(instant);
                let offset = tz.offset_from_utc_datetime(&utc);
                match offset.abbreviation() {
                    Some(abbreviation) => abbreviation.to_string(),
                    None => print_offset(seconds_to_millis(offset.fix().local_minus_utc())),
                }
            }
        }
    }

    /// Long display name at `instant`. The zone database carries no
    /// localized long names, so named zones use their id.
    pub fn name(&self, _instant: i64) -> String {
        self.id()
    }
}

impl Default for DateTimeZone {
    fn default() -> Self {
        DateTimeZone::UTC
    }
}

impl fmt::Display for DateTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for DateTimeZone {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_id(s)
    }
}

/// Formats an offset as `+HH:MM`, adding `:SS` and `.SSS` only when needed.
pub fn print_offset(offset: i32) -> String {
    let mut out = String::with_capacity(13);
    let mut rest = i64::from(offset);
    if rest >= 0 {
        out.push('+');
    } else {
        out.push('-');
        rest = -rest;
    }
    let hours = rest / MILLIS_PER_HOUR;
    rest -= hours * MILLIS_PER_HOUR;
    let minutes = rest / MILLIS_PER_MINUTE;
    rest -= minutes * MILLIS_PER_MINUTE;
    out.push_str(&format!("{hours:02}:{minutes:02}"));
    if rest == 0 {
        return out;
    }
    let seconds = rest / MILLIS_PER_SECOND;
    rest -= seconds * MILLIS_PER_SECOND;
    out.push_str(&format!(":{seconds:02}"));
    if rest == 0 {
        return out;
    }
    out.push_str(&format!(".{rest:03}"));
    out
}

/// Parses `±HH[:MM[:SS[.SSS]]]` (colons optional) into millis.
fn parse_offset(text: &str) -> Option<i32> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'+' => (false, &text[1..]),
        b'-' => (true, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':' && *c != '.').collect();
    if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let group = |from: usize, len: usize| -> Option<i64> {
        match digits.get(from..from + len) {
            Some(s) => s.parse().ok(),
            None => Some(0),
        }
    };
    let hours = group(0, 2)?;
    let minutes = group(2, 2)?;
    let seconds = group(4, 2)?;
    let millis = group(6, 3)?;
    if hours > 23 || minutes > 59 || seconds > 59 || digits.len() > 9 {
        return None;
    }
    let total = hours * MILLIS_PER_HOUR + minutes * MILLIS_PER_MINUTE + seconds * MILLIS_PER_SECOND + millis;
    let total = if negative { -total } else { total };
    i32::try_from(total).ok()
}

fn seconds_to_millis(seconds: i32) -> i32 {
    seconds.saturating_mul(1000)
}

/// Converts millis to a naive UTC date-time, clamping to chrono's range.
fn naive_from_millis(millis: i64) -> NaiveDateTime {
    match ChronoDateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.naive_utc(),
        None if millis < 0 => NaiveDateTime::MIN,
        None => NaiveDateTime::MAX,
    }
}
