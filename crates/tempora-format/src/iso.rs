//! ISO-8601 formatters assembled with the builder.
//!
//! Printing formatters print every part they name. The
//! [`date_optional_time_parser`] accepts the calendar, week and ordinal date
//! forms with an optional time and offset.

use crate::builder::FormatterBuilder;
use crate::element::{Alternation, FormatElement, Literal};
use crate::error::Result;
use crate::formatter::Formatter;

fn year(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    builder.append_year(4, 9)
}

fn calendar_date(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    year(builder)?
        .append_literal("-")
        .append_month_of_year(2)?
        .append_literal("-")
        .append_day_of_month(2)
}

fn hour_minute_second(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    builder
        .append_hour_of_day(2)?
        .append_literal(":")
        .append_minute_of_hour(2)?
        .append_literal(":")
        .append_second_of_minute(2)
}

fn offset(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    builder.append_time_zone_offset(Some("Z"), true, 2, 4)
}

fn fraction(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    builder.append_literal(".").append_fraction_of_second(3, 9)
}

/// `yyyy-MM-dd`
pub fn date() -> Result<Formatter> {
    calendar_date(&mut FormatterBuilder::new())?.to_formatter()
}

/// `HH:mm:ss.SSSZZ`, with a zero offset printed as `Z`.
pub fn time() -> Result<Formatter> {
    let mut builder = FormatterBuilder::new();
    hour_minute_second(&mut builder)?;
    fraction(&mut builder)?;
    offset(&mut builder)?;
    builder.to_formatter()
}

/// `yyyy-MM-dd'T'HH:mm:ss.SSSZZ`
pub fn date_time() -> Result<Formatter> {
    let mut builder = FormatterBuilder::new();
    calendar_date(&mut builder)?.append_literal("T");
    hour_minute_second(&mut builder)?;
    fraction(&mut builder)?;
    offset(&mut builder)?;
    builder.to_formatter()
}

/// `yyyy-MM-dd'T'HH:mm:ssZZ`
pub fn date_time_no_millis() -> Result<Formatter> {
    let mut builder = FormatterBuilder::new();
    calendar_date(&mut builder)?.append_literal("T");
    hour_minute_second(&mut builder)?;
    offset(&mut builder)?;
    builder.to_formatter()
}

/// `yyyyMMdd`
pub fn basic_date() -> Result<Formatter> {
    use tempora_chrono::DateTimeFieldType as F;
    FormatterBuilder::new()
        .append_year(4, 4)?
        .append_fixed_decimal(F::MonthOfYear, 2)?
        .append_fixed_decimal(F::DayOfMonth, 2)?
        .to_formatter()
}

fn ordinal_date_builder(builder: &mut FormatterBuilder) -> Result<&mut FormatterBuilder> {
    year(builder)?.append_literal("-").append_day_of_year(3)
}

/// `yyyy-DDD`
pub fn ordinal_date() -> Result<Formatter> {
    ordinal_date_builder(&mut FormatterBuilder::new())?.to_formatter()
}

/// `xxxx-'W'ww-e`
pub fn week_date() -> Result<Formatter> {
    FormatterBuilder::new()
        .append_weekyear(4, 9)?
        .append_literal("-W")
        .append_week_of_weekyear(2)?
        .append_literal("-")
        .append_day_of_week(1)?
        .to_formatter()
}

/// `HH:mm`
pub fn hour_minute() -> Result<Formatter> {
    FormatterBuilder::new()
        .append_hour_of_day(2)?
        .append_literal(":")
        .append_minute_of_hour(2)?
        .to_formatter()
}

/// A parser for any of `yyyy[-MM[-dd]]`, `xxxx-'W'ww[-e]` and `yyyy-DDD`,
/// optionally followed by `T`, a time of `HH[:mm[:ss[.S+]]]` and an offset.
/// A comma may stand in for the decimal point.
pub fn date_optional_time_parser() -> Result<Formatter> {
    let mut builder = FormatterBuilder::new();
    builder.append_alternatives(
        None,
        vec![
            Some(calendar_date_parser()?),
            Some(week_date_parser()?),
            Some(ordinal_date_builder(&mut FormatterBuilder::new())?.to_parser()?),
        ],
    )?;
    builder.append_optional(time_or_offset_parser()?);
    builder.to_formatter()
}

fn calendar_date_parser() -> Result<FormatElement> {
    let day = FormatterBuilder::new()
        .append_literal("-")
        .append_day_of_month(2)?
        .to_parser()?;
    let month = FormatterBuilder::new()
        .append_literal("-")
        .append_month_of_year(2)?
        .append_optional(day)
        .to_parser()?;
    year(&mut FormatterBuilder::new())?
        .append_optional(month)
        .to_parser()
}

fn week_date_parser() -> Result<FormatElement> {
    let day = FormatterBuilder::new()
        .append_literal("-")
        .append_day_of_week(1)?
        .to_parser()?;
    FormatterBuilder::new()
        .append_weekyear(4, 9)?
        .append_literal("-W")
        .append_week_of_weekyear(2)?
        .append_optional(day)
        .to_parser()
}

fn time_or_offset_parser() -> Result<FormatElement> {
    let decimal_point = FormatElement::Alternation(Alternation::new(vec![
        Some(FormatElement::Literal(Literal::new("."))),
        Some(FormatElement::Literal(Literal::new(","))),
    ]));
    let fraction = FormatterBuilder::new()
        .append_element(decimal_point)
        .append_fraction_of_second(1, 9)?
        .to_parser()?;
    let second = FormatterBuilder::new()
        .append_literal(":")
        .append_second_of_minute(2)?
        .append_optional(fraction)
        .to_parser()?;
    let minute = FormatterBuilder::new()
        .append_literal(":")
        .append_minute_of_hour(2)?
        .append_optional(second)
        .to_parser()?;
    let time = FormatterBuilder::new()
        .append_hour_of_day(2)?
        .append_optional(minute)
        .to_parser()?;
    let zone_offset = offset(&mut FormatterBuilder::new())?.to_parser()?;
    FormatterBuilder::new()
        .append_literal("T")
        .append_optional(time)
        .append_optional(zone_offset)
        .to_parser()
}
