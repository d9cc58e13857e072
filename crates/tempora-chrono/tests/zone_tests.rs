//! Zone lookup, offsets and transition handling.

use chrono::NaiveDate;
use tempora_chrono::{
    naive_to_local_millis, print_offset, ChronoError, DateTime, DateTimeFieldType, DateTimeZone,
    Locale,
};

const HOUR: i64 = 3_600_000;

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    let naive = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap();
    naive_to_local_millis(&naive)
}

fn los_angeles() -> DateTimeZone {
    DateTimeZone::for_id("America/Los_Angeles").unwrap()
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn for_id_recognises_utc_offsets_and_regions() {
    assert_eq!(DateTimeZone::for_id("UTC").unwrap(), DateTimeZone::UTC);
    assert_eq!(
        DateTimeZone::for_id("+05:30").unwrap(),
        DateTimeZone::Fixed((5 * HOUR + 30 * 60_000) as i32)
    );
    assert_eq!(
        DateTimeZone::for_id("-0800").unwrap(),
        DateTimeZone::Fixed((-8 * HOUR) as i32)
    );
    assert_eq!(los_angeles().id(), "America/Los_Angeles");
}

#[test]
fn for_id_rejects_unknown_ids() {
    assert_eq!(
        DateTimeZone::for_id("Mars/Olympus_Mons"),
        Err(ChronoError::UnknownZone("Mars/Olympus_Mons".to_string()))
    );
    assert!(DateTimeZone::for_id("+24:00").is_err(), "hours above 23 are rejected");
}

#[test]
fn for_offset_millis_bounds_the_offset() {
    assert!(DateTimeZone::for_offset_millis((24 * HOUR - 1) as i32).is_ok());
    assert_eq!(
        DateTimeZone::for_offset_millis((24 * HOUR) as i32),
        Err(ChronoError::OffsetOutOfRange(24 * HOUR))
    );
}

#[test]
fn available_ids_include_common_regions() {
    let ids: Vec<&str> = DateTimeZone::available_ids().collect();
    assert!(ids.contains(&"Europe/Paris"));
    assert!(ids.contains(&"America/Argentina/Buenos_Aires"));
}

#[test]
fn print_offset_shows_seconds_and_millis_only_when_present() {
    assert_eq!(print_offset(0), "+00:00");
    assert_eq!(print_offset((-5 * HOUR) as i32), "-05:00");
    assert_eq!(print_offset(3_723_004), "+01:02:03.004");
    assert_eq!(print_offset(3_723_000), "+01:02:03");
}

// ============================================================================
// Offsets and transitions
// ============================================================================

#[test]
fn named_zone_offset_follows_daylight_saving() {
    let la = los_angeles();
    let winter = local(2026, 1, 15, 12, 0);
    let summer = local(2026, 7, 15, 12, 0);
    assert_eq!(la.offset(winter), (-8 * HOUR) as i32);
    assert_eq!(la.offset(summer), (-7 * HOUR) as i32);
    assert_eq!(la.short_name(winter), "PST");
    assert_eq!(la.short_name(summer), "PDT");
    assert_eq!(la.name(summer), "America/Los_Angeles");
}

#[test]
fn offset_from_local_picks_earlier_instant_in_overlap() {
    // 2026-11-01 01:30 happens twice in Los Angeles.
    let la = los_angeles();
    let overlap = local(2026, 11, 1, 1, 30);
    assert_eq!(la.offset_from_local(overlap), (-7 * HOUR) as i32);
}

#[test]
fn offset_from_local_in_gap_does_not_round_trip() {
    // 2026-03-08 02:30 does not exist in Los Angeles.
    let la = los_angeles();
    let gap = local(2026, 3, 8, 2, 30);
    let offset = la.offset_from_local(gap);
    let instant = gap - i64::from(offset);
    assert_ne!(la.offset(instant), offset, "a gap must be detectable");

    let valid = local(2026, 3, 8, 3, 30);
    let offset = la.offset_from_local(valid);
    assert_eq!(la.offset(valid - i64::from(offset)), offset);
}

#[test]
fn fixed_zone_short_name_is_its_id() {
    let zone = DateTimeZone::for_id("+02:00").unwrap();
    assert_eq!(zone.short_name(0), "+02:00");
    assert!(zone.is_fixed());
}

// ============================================================================
// DateTime values and locales
// ============================================================================

#[test]
fn date_time_reads_fields_in_its_zone() {
    let instant = local(2026, 1, 15, 6, 0); // 06:00Z
    let utc = DateTime::utc(instant);
    let la = utc.with_zone(los_angeles());
    assert_eq!(utc.get(DateTimeFieldType::HourOfDay).unwrap(), 6);
    assert_eq!(la.get(DateTimeFieldType::HourOfDay).unwrap(), 22);
    assert_eq!(la.get(DateTimeFieldType::DayOfMonth).unwrap(), 14);
    assert_ne!(utc, la, "same instant in another zone is a different value");
    assert_eq!(la.millis(), utc.millis());
}

#[test]
fn date_time_converts_to_and_from_chrono() {
    let value = DateTime::utc(1_700_000_000_123);
    let chrono_value = value.to_utc().unwrap();
    assert_eq!(chrono_value.timestamp_millis(), 1_700_000_000_123);
    assert_eq!(DateTime::from(chrono_value), value);
}

#[test]
fn locale_tags_parse_with_either_separator() {
    let locale = Locale::parse("fr_FR").unwrap();
    assert_eq!(locale.language(), "fr");
    assert_eq!(locale.country(), Some("FR"));
    assert_eq!(locale.to_string(), "fr-FR");
    assert_eq!("de".parse::<Locale>().unwrap(), Locale::new("de"));
    assert!(Locale::parse("").is_err());
    assert!(Locale::parse("english").is_err());
}

#[test]
fn unknown_languages_fall_back_to_english_text() {
    assert_eq!(Locale::new("nl").symbols().months[0], "January");
    assert_eq!(Locale::new("de").symbols().months[2], "März");
}
