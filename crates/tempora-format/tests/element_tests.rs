//! Individual elements, alternation and builder validation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveTime, TimeZone, Utc};
use tempora_chrono::{DateTimeFieldType as F, DateTimeZone, IsoChronology, Locale, Partial};
use tempora_format::element::{Composite, Literal, NumberElement, ZoneOffset};
use tempora_format::numeric::append_padded;
use tempora_format::{FormatElement, FormatError, Formatter, FormatterBuilder, ParserBucket};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp_millis()
}

fn bucket() -> ParserBucket {
    ParserBucket::new(0, &IsoChronology::shared_utc(), Locale::english(), None, 2000)
}

fn parser(pattern: &str) -> FormatElement {
    Formatter::for_pattern(pattern).unwrap().parser().unwrap().clone()
}

fn offset_element(zero: Option<&str>, separators: bool, min: usize, max: usize) -> FormatElement {
    FormatElement::ZoneOffset(ZoneOffset::new(
        zero.map(str::to_string),
        zero.map(str::to_string),
        separators,
        min,
        max,
    ))
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn padding_handles_extreme_values() {
    let mut out = String::new();
    append_padded(&mut out, i32::MIN, 12);
    assert_eq!(out, "-002147483648");

    out.clear();
    append_padded(&mut out, i64::MIN, 1);
    assert_eq!(out, "-9223372036854775808");

    out.clear();
    append_padded(&mut out, 12345, 2);
    assert_eq!(out, "12345", "padding never truncates");
}

#[test]
fn fixed_width_number_must_fill_its_width() {
    let hour = FormatElement::Number(NumberElement::fixed(F::HourOfDay, 2, false));
    assert_eq!(hour.parse(&mut bucket(), "07:", 0), Ok(2));
    assert_eq!(hour.parse(&mut bucket(), "7:", 0), Err(1));

    let f = FormatterBuilder::new()
        .append_fixed_decimal(F::HourOfDay, 2)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.parse_millis("123").unwrap_err().position(), Some(2));
}

#[test]
fn fixed_width_number_prints_placeholders_when_too_wide() {
    let f = FormatterBuilder::new()
        .append_fixed_decimal(F::DayOfYear, 2)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.print_millis(utc(2024, 1, 9, 0, 0, 0)).unwrap(), "09");
    assert_eq!(f.print_millis(utc(2024, 4, 10, 0, 0, 0)).unwrap(), "\u{FFFD}\u{FFFD}");
}

#[test]
fn signed_decimal_accepts_a_sign() {
    let f = FormatterBuilder::new()
        .append_signed_decimal(F::Year, 4, 9)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.parse_millis("-0042").unwrap(), utc(-42, 1, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("+2024").unwrap(), utc(2024, 1, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("+").unwrap_err().position(), Some(0));
}

#[test]
fn unsigned_decimal_stops_at_max_digits() {
    let year = FormatElement::Number(NumberElement::unpadded(F::Year, 4, false));
    let mut bucket = bucket();
    assert_eq!(year.parse(&mut bucket, "202405", 0), Ok(4));
    assert_eq!(year.parse(&mut bucket, "-2024", 0), Err(0));
}

// ============================================================================
// Fractions
// ============================================================================

#[test]
fn fraction_parses_any_precision() {
    let f = FormatterBuilder::new()
        .append_second_of_minute(2)
        .unwrap()
        .append_literal(".")
        .append_fraction_of_second(1, 9)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.parse_millis("07.5").unwrap(), 7_500);
    assert_eq!(f.parse_millis("07.123456789").unwrap(), 7_123);
    assert_eq!(f.parse_millis("07.").unwrap_err().position(), Some(3));
}

#[test]
fn fraction_of_minute_prints_elapsed_share() {
    let f = FormatterBuilder::new()
        .append_fraction_of_minute(3, 3)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.print_millis(utc(2024, 1, 1, 0, 0, 30)).unwrap(), "500");
    assert_eq!(f.print_millis(utc(2024, 1, 1, 0, 0, 0)).unwrap(), "000");
}

// ============================================================================
// Zone offsets
// ============================================================================

#[test]
fn offset_prints_requested_groups() {
    let millis = utc(2024, 1, 1, 0, 0, 0);
    let print = |min: usize, max: usize, separators: bool, offset: i32| {
        FormatterBuilder::new()
            .append_time_zone_offset(None, separators, min, max)
            .unwrap()
            .to_formatter()
            .unwrap()
            .with_zone(DateTimeZone::Fixed(offset))
            .print_millis(millis)
            .unwrap()
    };
    assert_eq!(print(2, 4, true, 19_800_000), "+05:30");
    assert_eq!(print(2, 4, true, -10_800_000), "-03:00");
    assert_eq!(print(2, 4, true, 19_815_000), "+05:30:15");
    assert_eq!(print(2, 4, false, 19_815_250), "+053015250");
    assert_eq!(print(1, 4, true, 18_000_000), "+05");
    assert_eq!(print(1, 1, true, 19_800_000), "+05");
}

#[test]
fn offset_prints_zero_text() {
    let f = FormatterBuilder::new()
        .append_time_zone_offset(Some("Z"), true, 2, 2)
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.print_millis(0).unwrap(), "Z");
}

#[test]
fn offset_element_clamps_field_counts() {
    let none = offset_element(None, true, 0, 0);
    assert_eq!(none, offset_element(None, true, 1, 1));
    assert_eq!(none.estimate_printed_length(), 4);

    let wide = offset_element(None, true, 9, 2);
    assert_eq!(wide, offset_element(None, true, 4, 4));
    assert_eq!(wide.estimate_printed_length(), 13);
}

#[test]
fn offset_parses_each_group() {
    let element = offset_element(None, true, 2, 4);
    let cases = [
        ("+05:30", 6, 19_800_000),
        ("-0830", 5, -30_600_000),
        ("+05", 3, 18_000_000),
        ("+05:30:15.250", 13, 19_815_250),
        ("+05:30 rest", 6, 19_800_000),
    ];
    for (text, end, offset) in cases {
        let mut bucket = bucket();
        assert_eq!(element.parse(&mut bucket, text, 0), Ok(end), "end of {text:?}");
        assert_eq!(bucket.offset(), Some(offset), "offset of {text:?}");
    }
}

#[test]
fn offset_rejects_out_of_range_groups() {
    let element = offset_element(None, true, 2, 4);
    assert_eq!(element.parse(&mut bucket(), "+24:00", 0), Err(1));
    assert_eq!(element.parse(&mut bucket(), "+05:60", 0), Err(4));
    assert_eq!(element.parse(&mut bucket(), "+05:3", 0), Err(4));
    assert_eq!(element.parse(&mut bucket(), "05:30", 0), Err(0));
}

#[test]
fn offset_zero_text_matches_ignoring_case() {
    let element = offset_element(Some("Z"), true, 2, 4);
    let mut bucket = bucket();
    assert_eq!(element.parse(&mut bucket, "z", 0), Ok(1));
    assert_eq!(bucket.offset(), Some(0));
}

#[test]
fn empty_zero_text_matches_when_no_sign_follows() {
    let element = offset_element(Some(""), true, 2, 4);
    let mut bucket = bucket();
    assert_eq!(element.parse(&mut bucket, "x", 0), Ok(0));
    assert_eq!(bucket.offset(), Some(0));
    assert_eq!(element.parse(&mut bucket, "+01:00", 0), Ok(6));
    assert_eq!(bucket.offset(), Some(3_600_000));
}

// ============================================================================
// Zone ids and names
// ============================================================================

#[test]
fn zone_id_matches_longest_id_in_prefix_group() {
    let element = FormatterBuilder::new().append_time_zone_id().to_parser().unwrap();
    let mut bucket = bucket();
    let text = "America/Argentina/Buenos_Aires!";
    assert_eq!(element.parse(&mut bucket, text, 0), Ok(text.len() - 1));
    assert_eq!(
        bucket.zone(),
        Some(DateTimeZone::for_id("America/Argentina/Buenos_Aires").unwrap())
    );

    assert_eq!(element.parse(&mut bucket, "UTC", 0), Ok(3));
    assert_eq!(bucket.zone(), Some(DateTimeZone::UTC));
}

#[test]
fn zone_id_rejects_unknown_prefix() {
    let element = FormatterBuilder::new().append_time_zone_id().to_parser().unwrap();
    assert_eq!(element.parse(&mut bucket(), "Mars/Olympus", 0), Err(0));
    assert_eq!(element.parse(&mut bucket(), "12:00 Mars/Olympus", 6), Err(6));
}

#[test]
fn zone_name_lookup_prefers_longest_match() {
    let paris = DateTimeZone::for_id("Europe/Paris").unwrap();
    let names: BTreeMap<String, DateTimeZone> = [
        ("CE".to_string(), DateTimeZone::UTC),
        ("CET".to_string(), paris),
        ("CEST".to_string(), paris),
    ]
    .into_iter()
    .collect();
    let f = FormatterBuilder::new()
        .append_time_zone_short_name_with(Some(Arc::new(names)))
        .to_formatter()
        .unwrap();
    let element = f.parser().unwrap();
    let mut bucket = bucket();
    assert_eq!(element.parse(&mut bucket, "CEST", 0), Ok(4));
    assert_eq!(bucket.zone(), Some(paris));
    assert_eq!(element.parse(&mut bucket, "GMT", 0), Err(0));
}

#[test]
fn long_zone_name_prints_the_id() {
    let f = FormatterBuilder::new().append_time_zone_name().to_formatter().unwrap();
    let tokyo = DateTimeZone::for_id("Asia/Tokyo").unwrap();
    assert_eq!(f.with_zone(tokyo).print_millis(0).unwrap(), "Asia/Tokyo");
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn text_takes_longest_match() {
    let f = Formatter::for_pattern("MMM yyyy").unwrap();
    assert_eq!(f.parse_millis("March 2024").unwrap(), utc(2024, 3, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("mar 2024").unwrap(), utc(2024, 3, 1, 0, 0, 0));
    let err = f.parse_millis("Foo 2024").unwrap_err();
    assert_eq!(err.to_string(), "Invalid format: \"Foo 2024\"");
}

// ============================================================================
// Alternation and optional parts
// ============================================================================

fn either_separator() -> Formatter {
    let mut builder = FormatterBuilder::new();
    builder
        .append_alternatives(
            None,
            vec![Some(parser("yyyy-MM-dd")), Some(parser("yyyy/MM/dd"))],
        )
        .unwrap();
    builder.to_formatter().unwrap()
}

#[test]
fn alternation_accepts_any_branch() {
    let f = either_separator();
    assert!(!f.is_printer());
    assert_eq!(f.parse_millis("2020-03-01").unwrap(), utc(2020, 3, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("2020/03/01").unwrap(), utc(2020, 3, 1, 0, 0, 0));
}

#[test]
fn alternation_reports_furthest_failure() {
    let f = either_separator();
    let err = f.parse_millis("2020-13").unwrap_err();
    assert_eq!(err.position(), Some(7));
    assert_eq!(err.to_string(), "Invalid format: \"2020-13\" is too short");

    let err = f.parse_millis("2020-13-01").unwrap_err();
    assert!(
        matches!(&err, FormatError::IllegalFieldValue(inner) if inner.field() == F::MonthOfYear),
        "unexpected error: {err:?}"
    );
}

#[test]
fn alternation_keeps_only_the_longest_branch() {
    let mut builder = FormatterBuilder::new();
    builder
        .append_alternatives(None, vec![Some(parser("yyyy-MM")), Some(parser("yyyy"))])
        .unwrap()
        .append_literal("x");
    let f = builder.to_formatter().unwrap();
    assert_eq!(f.parse_millis("2024-05x").unwrap(), utc(2024, 5, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("2024x").unwrap(), utc(2024, 1, 1, 0, 0, 0));
}

#[test]
fn optional_part_may_be_absent() {
    let mut builder = FormatterBuilder::new();
    builder
        .append_year(4, 4)
        .unwrap()
        .append_optional(parser("-MM"));
    let f = builder.to_formatter().unwrap();
    assert_eq!(f.parse_millis("2024").unwrap(), utc(2024, 1, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("2024-07").unwrap(), utc(2024, 7, 1, 0, 0, 0));
    assert_eq!(f.parse_millis("2024-").unwrap_err().position(), Some(4));
}

#[test]
fn nested_composites_flatten() {
    let inner = Composite::new([
        FormatElement::Literal(Literal::new("a")),
        FormatElement::Literal(Literal::new("b")),
    ]);
    let outer = Composite::new([FormatElement::Composite(inner), FormatElement::Literal(Literal::new("c"))]);
    assert_eq!(outer.len(), 3);
    assert!(outer.elements().iter().all(|e| matches!(e, FormatElement::Literal(_))));
}

// ============================================================================
// Partial printing
// ============================================================================

#[test]
fn partial_prints_placeholders_and_skips_zones() {
    let partial = Partial::new().with(F::MonthOfYear, 3);
    let f = Formatter::for_pattern("MM/dd MMM").unwrap();
    assert_eq!(f.print_partial(&partial).unwrap(), "03/\u{FFFD}\u{FFFD} Mar");

    let f = Formatter::for_pattern("EEE").unwrap();
    assert_eq!(f.print_partial(&partial).unwrap(), "\u{FFFD}");

    let time = NaiveTime::from_hms_opt(10, 15, 0).unwrap();
    let f = Formatter::for_pattern("HH:mm ZZ").unwrap();
    assert_eq!(f.print_partial(&time).unwrap(), "10:15 ");
}

// ============================================================================
// Builder validation
// ============================================================================

#[test]
fn builder_rejects_impossible_widths() {
    let err = FormatterBuilder::new().append_decimal(F::Year, 0, 0).unwrap_err();
    assert_eq!(err, FormatError::InvalidBuilder("Illegal number of digits: 0".to_string()));
    assert!(FormatterBuilder::new().append_fixed_decimal(F::Year, 0).is_err());
    assert!(FormatterBuilder::new().append_fraction_of_second(0, 0).is_err());
}

#[test]
fn builder_rejects_bad_alternatives() {
    let message = |parsers: Vec<Option<FormatElement>>| {
        FormatterBuilder::new()
            .append_alternatives(None, parsers)
            .unwrap_err()
            .to_string()
    };
    assert_eq!(message(vec![]), "No parsers supplied");
    assert_eq!(message(vec![None]), "No parser supplied");
    assert_eq!(message(vec![None, Some(parser("yyyy"))]), "Incomplete parser array");
}

#[test]
fn builder_rejects_bad_offset_fields() {
    assert!(FormatterBuilder::new().append_time_zone_offset(None, true, 0, 2).is_err());
    assert!(FormatterBuilder::new().append_time_zone_offset(None, true, 3, 2).is_err());
}

#[test]
fn builder_reports_missing_halves() {
    let empty = FormatterBuilder::new();
    assert_eq!(
        empty.to_formatter().unwrap_err(),
        FormatError::InvalidBuilder("Both printing and parsing not supported".to_string())
    );

    let mut parse_only = FormatterBuilder::new();
    parse_only.append_optional(parser("yyyy"));
    assert!(parse_only.can_build_parser());
    assert!(!parse_only.can_build_printer());
    let f = parse_only.to_formatter().unwrap();
    assert_eq!(f.print_millis(0), Err(FormatError::PrintingNotSupported));

    let mut print_only = FormatterBuilder::new();
    print_only.append_time_zone_name();
    assert_eq!(print_only.to_parser().unwrap_err(), FormatError::ParsingNotSupported);
}

#[test]
fn suffix_needs_a_preceding_field() {
    let no_field = FormatError::IllegalState("No field to apply suffix to".to_string());
    assert_eq!(FormatterBuilder::new().append_suffix("h").unwrap_err(), no_field);

    let mut after_literal = FormatterBuilder::new();
    after_literal.append_literal("at ");
    assert_eq!(after_literal.append_suffix("h").unwrap_err(), no_field);

    let mut twice = FormatterBuilder::new();
    twice.append_hour_of_day(1).unwrap().append_suffix("h").unwrap();
    assert_eq!(twice.append_plural_suffix(" hour", " hours").unwrap_err(), no_field);
}

#[test]
fn prefix_needs_a_following_field() {
    let mut builder = FormatterBuilder::new();
    builder.append_hour_of_day(2).unwrap().append_prefix(":");
    assert_eq!(
        builder.to_formatter().unwrap_err(),
        FormatError::IllegalState("No field to apply prefix to".to_string())
    );
    builder.append_literal(" ").append_minute_of_hour(2).unwrap();
    let f = builder.to_formatter().unwrap();
    assert_eq!(f.print_millis(utc(2024, 1, 1, 9, 5, 0)).unwrap(), "09 :05");
}

#[test]
fn affixes_print_and_parse_with_the_field() {
    let f = FormatterBuilder::new()
        .append_hour_of_day(1)
        .unwrap()
        .append_suffix("h")
        .unwrap()
        .append_minute_of_hour(2)
        .unwrap()
        .append_plural_suffix(" minute", " minutes")
        .unwrap()
        .to_formatter()
        .unwrap();
    assert_eq!(f.print_millis(utc(1970, 1, 1, 9, 1, 0)).unwrap(), "9h01 minute");
    assert_eq!(f.print_millis(utc(1970, 1, 1, 9, 30, 0)).unwrap(), "9h30 minutes");
    assert_eq!(f.parse_millis("9H30 MINUTES").unwrap(), utc(1970, 1, 1, 9, 30, 0));
    assert_eq!(f.parse_millis("9h01 minute").unwrap(), utc(1970, 1, 1, 9, 1, 0));
    assert_eq!(f.parse_millis("9:30 minutes").unwrap_err().position(), Some(1));
}

#[test]
fn builder_can_be_cleared_and_reused() {
    let mut builder = FormatterBuilder::new();
    builder.append_literal("x");
    assert!(!builder.is_empty());
    builder.clear().append_literal("");
    assert!(builder.is_empty(), "empty literal appends nothing");
}
