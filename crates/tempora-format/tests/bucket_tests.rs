//! Resolution of saved fields into instants.

use chrono::{TimeZone, Utc};
use tempora_chrono::{DateTimeFieldType as F, DateTimeZone, IsoChronology, Locale};
use tempora_format::{FormatError, ParserBucket};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp_millis()
}

fn bucket() -> ParserBucket {
    ParserBucket::new(0, &IsoChronology::shared_utc(), Locale::english(), None, 2000)
}

fn bucket_in(zone: &str) -> ParserBucket {
    let zone = DateTimeZone::for_id(zone).unwrap();
    ParserBucket::new(0, &IsoChronology::shared(zone), Locale::english(), None, 2000)
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn fields_resolve_most_significant_first() {
    let mut bucket = bucket();
    bucket.save_field(F::DayOfWeek, 3);
    bucket.save_field(F::MonthOfYear, 3);
    bucket.save_field(F::DayOfMonth, 15);
    bucket.save_field(F::DayOfYear, 75);
    assert_eq!(
        bucket.resolution_order(),
        vec![F::MonthOfYear, F::DayOfYear, F::DayOfMonth, F::DayOfWeek]
    );
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2000, 3, 15, 0, 0, 0));
}

#[test]
fn save_order_does_not_change_the_result() {
    let fields = [
        (F::Year, 2024),
        (F::MonthOfYear, 7),
        (F::DayOfMonth, 4),
        (F::HourOfDay, 9),
        (F::MinuteOfHour, 41),
    ];
    let mut forward = bucket();
    for (field, value) in fields {
        forward.save_field(field, value);
    }
    let mut backward = bucket();
    for (field, value) in fields.into_iter().rev() {
        backward.save_field(field, value);
    }
    assert_eq!(forward.resolution_order(), backward.resolution_order());
    assert_eq!(
        forward.compute_millis(true, None).unwrap(),
        backward.compute_millis(true, None).unwrap()
    );
    assert_eq!(forward.compute_millis(true, None).unwrap(), utc(2024, 7, 4, 9, 41, 0));
}

#[test]
fn later_day_of_week_adjusts_the_parsed_date() {
    // 2024-03-10 is a Sunday; Monday of that ISO week is 2024-03-04.
    let mut bucket = bucket();
    bucket.save_field(F::DayOfWeek, 1);
    bucket.save_field(F::Year, 2024);
    bucket.save_field(F::MonthOfYear, 3);
    bucket.save_field(F::DayOfMonth, 10);
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2024, 3, 4, 0, 0, 0));
}

// ============================================================================
// Default year
// ============================================================================

#[test]
fn default_year_applies_to_month_and_day() {
    let mut bucket = ParserBucket::new(0, &IsoChronology::shared_utc(), Locale::english(), None, 1988);
    bucket.save_field(F::MonthOfYear, 2);
    bucket.save_field(F::DayOfMonth, 29);
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(1988, 2, 29, 0, 0, 0));
    assert_eq!(bucket.saved_field_count(), 3, "year was saved into the bucket");
}

#[test]
fn default_year_skipped_for_time_only_and_explicit_years() {
    let mut time_only = bucket();
    time_only.save_field(F::HourOfDay, 5);
    assert_eq!(time_only.compute_millis(true, None).unwrap(), utc(1970, 1, 1, 5, 0, 0));

    let mut with_year = bucket();
    with_year.save_field(F::MonthOfYear, 6);
    with_year.save_field(F::Year, 1999);
    assert_eq!(with_year.compute_millis(true, None).unwrap(), utc(1999, 6, 1, 0, 0, 0));
    assert_eq!(with_year.saved_field_count(), 2);
}

// ============================================================================
// Reset behaviour
// ============================================================================

#[test]
fn without_reset_unparsed_fields_keep_the_base() {
    let base = utc(2021, 6, 15, 10, 20, 30);
    let mut bucket = ParserBucket::new(base, &IsoChronology::shared_utc(), Locale::english(), None, 2021);
    bucket.save_field(F::Year, 2020);
    assert_eq!(bucket.compute_millis(false, None).unwrap(), utc(2020, 6, 15, 10, 20, 30));
}

#[test]
fn with_reset_unparsed_fields_are_floored() {
    let base = utc(2021, 6, 15, 10, 20, 30);
    let mut bucket = ParserBucket::new(base, &IsoChronology::shared_utc(), Locale::english(), None, 2021);
    bucket.save_field(F::Year, 2020);
    bucket.save_field(F::MonthOfYear, 8);
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2020, 8, 1, 0, 0, 0));
}

#[test]
fn reset_clears_saved_fields() {
    let mut bucket = bucket();
    bucket.save_field(F::Year, 1999);
    bucket.set_offset(Some(3_600_000));
    bucket.reset();
    assert_eq!(bucket.saved_field_count(), 0);
    assert_eq!(bucket.offset(), None);
    assert_eq!(bucket.compute_millis(true, None).unwrap(), 0);
}

// ============================================================================
// Offsets and zones
// ============================================================================

#[test]
fn parsed_offset_is_subtracted() {
    let mut bucket = bucket();
    bucket.save_field(F::HourOfDay, 10);
    bucket.set_offset(Some(3_600_000));
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(1970, 1, 1, 9, 0, 0));
}

#[test]
fn offset_wins_over_zone() {
    let mut bucket = bucket_in("Asia/Tokyo");
    bucket.save_field(F::HourOfDay, 10);
    bucket.set_offset(Some(-5 * 3_600_000));
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(1970, 1, 1, 15, 0, 0));
}

#[test]
fn zone_offset_depends_on_the_local_date() {
    let mut summer = bucket_in("Europe/Paris");
    for (field, value) in [(F::Year, 2024), (F::MonthOfYear, 7), (F::DayOfMonth, 1), (F::HourOfDay, 12)] {
        summer.save_field(field, value);
    }
    assert_eq!(summer.compute_millis(true, None).unwrap(), utc(2024, 7, 1, 10, 0, 0));

    let mut winter = bucket_in("Europe/Paris");
    for (field, value) in [(F::Year, 2024), (F::MonthOfYear, 1), (F::DayOfMonth, 1), (F::HourOfDay, 12)] {
        winter.save_field(field, value);
    }
    assert_eq!(winter.compute_millis(true, None).unwrap(), utc(2024, 1, 1, 11, 0, 0));
}

#[test]
fn local_time_in_a_gap_is_an_illegal_instant() {
    let mut bucket = bucket_in("America/Los_Angeles");
    for (field, value) in [
        (F::Year, 2026),
        (F::MonthOfYear, 3),
        (F::DayOfMonth, 8),
        (F::HourOfDay, 2),
        (F::MinuteOfHour, 30),
    ] {
        bucket.save_field(field, value);
    }
    let err = bucket.compute_millis(true, Some("2026-03-08 02:30")).unwrap_err();
    assert_eq!(
        err,
        FormatError::IllegalInstant {
            text: Some("2026-03-08 02:30".to_string()),
            zone: "America/Los_Angeles".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Cannot parse \"2026-03-08 02:30\": Illegal instant due to time zone offset transition (America/Los_Angeles)"
    );
}

#[test]
fn overlap_resolves_to_the_earlier_instant() {
    // 01:30 occurs twice on 2024-11-03 in Los Angeles; the PDT one is first.
    let mut bucket = bucket_in("America/Los_Angeles");
    for (field, value) in [
        (F::Year, 2024),
        (F::MonthOfYear, 11),
        (F::DayOfMonth, 3),
        (F::HourOfDay, 1),
        (F::MinuteOfHour, 30),
    ] {
        bucket.save_field(field, value);
    }
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2024, 11, 3, 8, 30, 0));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn out_of_range_value_gets_text_prefix() {
    let mut bucket = bucket();
    bucket.save_field(F::MonthOfYear, 13);
    let err = bucket.compute_millis(true, Some("13")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot parse \"13\": Value 13 for monthOfYear must be in the range [1,12]"
    );

    bucket.reset();
    bucket.save_field(F::MonthOfYear, 13);
    let err = bucket.compute_millis(true, None).unwrap_err();
    assert_eq!(err.to_string(), "Value 13 for monthOfYear must be in the range [1,12]");
}

#[test]
fn unknown_text_is_rejected_at_resolution() {
    let mut bucket = bucket();
    bucket.save_field_text(F::MonthOfYear, "Brumaire");
    let err = bucket.compute_millis(true, None).unwrap_err();
    assert!(
        matches!(&err, FormatError::IllegalFieldValue(inner) if inner.field() == F::MonthOfYear),
        "unexpected error: {err:?}"
    );
}

#[test]
fn saved_text_resolves_in_the_bucket_locale() {
    let mut bucket = ParserBucket::new(0, &IsoChronology::shared_utc(), Locale::new("fr"), None, 2000);
    bucket.save_field(F::Year, 2024);
    bucket.save_field_text(F::MonthOfYear, "août");
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2024, 8, 1, 0, 0, 0));
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn restore_discards_later_saves_and_zone() {
    let mut bucket = bucket();
    bucket.save_field(F::Year, 2020);
    let state = bucket.save_state();

    bucket.save_field(F::MonthOfYear, 5);
    bucket.set_offset(Some(60_000));
    bucket.set_zone(DateTimeZone::for_id("Asia/Tokyo").unwrap());

    assert!(bucket.restore_state(&state));
    assert_eq!(bucket.saved_field_count(), 1);
    assert_eq!(bucket.offset(), None);
    assert_eq!(bucket.zone(), Some(DateTimeZone::UTC));
    assert_eq!(bucket.compute_millis(true, None).unwrap(), utc(2020, 1, 1, 0, 0, 0));
}

#[test]
fn snapshot_can_be_restored_more_than_once() {
    let mut bucket = bucket();
    let empty = bucket.save_state();
    bucket.save_field(F::Year, 2020);
    assert!(bucket.restore_state(&empty));
    bucket.save_field(F::Year, 1990);
    assert!(bucket.restore_state(&empty));
    assert_eq!(bucket.saved_field_count(), 0);
}

#[test]
fn state_from_another_bucket_is_ignored() {
    let mut mine = bucket();
    mine.save_field(F::Year, 2001);
    let mut other = bucket();
    other.save_field(F::Year, 1999);
    other.save_field(F::MonthOfYear, 4);
    let foreign = other.save_state();

    assert!(!mine.restore_state(&foreign));
    assert_eq!(mine.saved_field_count(), 1);
    assert_eq!(mine.compute_millis(true, None).unwrap(), utc(2001, 1, 1, 0, 0, 0));
}
