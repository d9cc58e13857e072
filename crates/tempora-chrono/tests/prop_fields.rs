//! Property-based tests for ISO field arithmetic and fixed zones.

use proptest::prelude::*;
use tempora_chrono::{
    Chronology, DateTimeField, DateTimeFieldType as F, DateTimeZone, IsoChronology, Partial,
    ReadablePartial,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Local millis within roughly +/- 10,000 years of the epoch.
fn arb_local() -> impl Strategy<Value = i64> {
    -315_000_000_000_000i64..=315_000_000_000_000
}

fn arb_time_field() -> impl Strategy<Value = (F, i32)> {
    prop_oneof![
        (0i32..24).prop_map(|v| (F::HourOfDay, v)),
        (0i32..60).prop_map(|v| (F::MinuteOfHour, v)),
        (0i32..60).prop_map(|v| (F::SecondOfMinute, v)),
        (0i32..1000).prop_map(|v| (F::MillisOfSecond, v)),
        (1i32..=12).prop_map(|v| (F::ClockhourOfHalfday, v)),
        (0i32..2).prop_map(|v| (F::HalfdayOfDay, v)),
    ]
}

// ---------------------------------------------------------------------------
// Set then get
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn time_field_reads_back_what_was_set(instant in arb_local(), (field, value) in arb_time_field()) {
        let iso = IsoChronology::utc();
        let set = iso.field(field).set(instant, value).unwrap();
        prop_assert_eq!(iso.field(field).get(set).unwrap(), value);
        prop_assert_eq!(iso.field(F::Year).get(set).unwrap(), iso.field(F::Year).get(instant).unwrap());
    }

    #[test]
    fn month_set_clamps_day(instant in arb_local(), month in 1i32..=12) {
        let iso = IsoChronology::utc();
        let set = iso.field(F::MonthOfYear).set(instant, month).unwrap();
        prop_assert_eq!(iso.field(F::MonthOfYear).get(set).unwrap(), month);
        prop_assert!(iso.field(F::DayOfMonth).get(set).unwrap() <= iso.field(F::DayOfMonth).get(instant).unwrap());
    }

    #[test]
    fn day_of_week_stays_in_the_same_week(instant in arb_local(), day in 1i32..=7) {
        let iso = IsoChronology::utc();
        let set = iso.field(F::DayOfWeek).set(instant, day).unwrap();
        prop_assert_eq!(iso.field(F::DayOfWeek).get(set).unwrap(), day);
        prop_assert_eq!(
            iso.field(F::WeekOfWeekyear).get(set).unwrap(),
            iso.field(F::WeekOfWeekyear).get(instant).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Flooring
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn floor_is_within_one_unit(instant in arb_local(), field in prop_oneof![
        Just(F::DayOfMonth),
        Just(F::HourOfDay),
        Just(F::MinuteOfHour),
        Just(F::SecondOfMinute),
    ]) {
        let iso = IsoChronology::utc();
        let field = iso.field(field);
        let floor = field.round_floor(instant).unwrap();
        let remainder = field.remainder(instant).unwrap();
        prop_assert!(floor <= instant);
        prop_assert_eq!(floor + remainder, instant);
        prop_assert!(remainder < field.duration_field().unit_millis());
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fixed_zone_offsets_round_trip(offset in -86_399_999i32..=86_399_999, local in arb_local()) {
        let zone = DateTimeZone::for_offset_millis(offset).unwrap();
        prop_assert_eq!(zone.offset_from_local(local), offset);
        prop_assert_eq!(zone.offset(local - i64::from(offset)), offset);
        prop_assert!(zone.is_fixed());
    }
}

#[test]
fn partial_deserializes_from_field_names() {
    let partial: Partial = serde_json::from_str(r#"{"monthOfYear": 3, "dayOfMonth": 15}"#).unwrap();
    assert_eq!(partial.len(), 2);
    assert_eq!(partial.get(F::MonthOfYear), Some(3));
    assert_eq!(partial.get(F::DayOfMonth), Some(15));
    assert_eq!(partial.get(F::Year), None);
    assert_eq!(
        serde_json::to_string(&partial).unwrap(),
        r#"{"monthOfYear":3,"dayOfMonth":15}"#,
        "fields serialize most significant first"
    );
}
