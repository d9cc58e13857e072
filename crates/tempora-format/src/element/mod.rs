//! The closed set of printer/parser elements a formatter is assembled from.
//!
//! Every element is immutable after construction and can be shared across
//! threads. Printing never fails: a field the calendar cannot supply is
//! written as U+FFFD so one bad field does not blank the whole output.
//! Parsing reports a [`ParseOutcome`]: `Ok(next)` is the first unconsumed
//! byte offset, `Err(at)` the offset where matching failed.

mod affix;
mod composite;
mod fraction;
mod literal;
mod matching;
mod number;
mod text;
mod zone;

pub use affix::{Affix, Affixed};
pub use composite::Composite;
pub use fraction::Fraction;
pub use literal::Literal;
pub use matching::Alternation;
pub use number::{NumberElement, TwoDigitYear};
pub use text::{TextField, TextLookup};
pub use zone::{ZoneId, ZoneName, ZoneNameStyle, ZoneNames, ZoneOffset};

use tempora_chrono::{Chronology, DateTimeFieldType, DateTimeZone, Locale, ReadablePartial};

use crate::bucket::ParserBucket;

/// Result of running a parser element: `Ok(next position)` or
/// `Err(failure position)`.
pub type ParseOutcome = std::result::Result<usize, usize>;

/// Written in place of a value the calendar could not supply.
pub const UNKNOWN_CHAR: char = '\u{FFFD}';

pub(crate) fn append_unknown(out: &mut String, len: usize) {
    out.extend(std::iter::repeat(UNKNOWN_CHAR).take(len));
}

/// Everything an element needs to print one instant.
#[derive(Debug, Clone, Copy)]
pub struct PrintContext<'a> {
    /// The instant shifted into local time.
    pub local_millis: i64,
    /// Calendar to read fields with, already in UTC.
    pub chronology: &'a dyn Chronology,
    /// Offset that was added to produce `local_millis`.
    pub display_offset: i32,
    pub display_zone: Option<DateTimeZone>,
    pub locale: &'a Locale,
}

impl PrintContext<'_> {
    /// The original instant, before the display offset was applied.
    pub fn instant(&self) -> i64 {
        self.local_millis - i64::from(self.display_offset)
    }
}

/// One printer and/or parser element.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatElement {
    Literal(Literal),
    Number(NumberElement),
    TwoDigitYear(TwoDigitYear),
    Text(TextField),
    Fraction(Fraction),
    ZoneOffset(ZoneOffset),
    ZoneName(ZoneName),
    ZoneId(ZoneId),
    Composite(Composite),
    Alternation(Alternation),
    Affixed(Affixed),
}

impl FormatElement {
    /// The calendar field a value element reads and saves, if any.
    pub fn field_type(&self) -> Option<DateTimeFieldType> {
        match self {
            FormatElement::Number(e) => Some(e.field()),
            FormatElement::TwoDigitYear(e) => Some(e.field()),
            FormatElement::Text(e) => Some(e.field()),
            FormatElement::Fraction(e) => Some(e.field()),
            FormatElement::Affixed(e) => e.field().field_type(),
            _ => None,
        }
    }

    /// Whether this element, and everything it contains, can print.
    pub fn can_print(&self) -> bool {
        match self {
            FormatElement::Alternation(_) => false,
            FormatElement::Composite(composite) => composite.can_print(),
            _ => true,
        }
    }

    /// Whether this element, and everything it contains, can parse.
    pub fn can_parse(&self) -> bool {
        match self {
            FormatElement::Composite(composite) => composite.can_parse(),
            _ => true,
        }
    }

    /// Upper bound on printed characters, used to size buffers.
    pub fn estimate_printed_length(&self) -> usize {
        match self {
            FormatElement::Literal(e) => e.estimate_length(),
            FormatElement::Number(e) => e.estimate_length(),
            FormatElement::TwoDigitYear(_) => 2,
            FormatElement::Text(e) => e.estimate_length(),
            FormatElement::Fraction(e) => e.estimate_length(),
            FormatElement::ZoneOffset(e) => e.estimate_printed_length(),
            FormatElement::ZoneName(e) => e.estimate_length(),
            FormatElement::ZoneId(_) => ZoneId::estimate_length(),
            FormatElement::Composite(e) => e.estimate_printed_length(),
            FormatElement::Alternation(_) => 0,
            FormatElement::Affixed(e) => e.estimate_printed_length(),
        }
    }

    /// Upper bound on characters consumed when parsing.
    pub fn estimate_parsed_length(&self) -> usize {
        match self {
            FormatElement::ZoneOffset(e) => e.estimate_parsed_length(),
            FormatElement::Composite(e) => e.estimate_parsed_length(),
            FormatElement::Alternation(e) => e.estimate_parsed_length(),
            FormatElement::Affixed(e) => e.estimate_parsed_length(),
            other => other.estimate_printed_length(),
        }
    }

    pub fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        match self {
            FormatElement::Literal(e) => e.print(out),
            FormatElement::Number(e) => e.print(out, ctx),
            FormatElement::TwoDigitYear(e) => e.print(out, ctx),
            FormatElement::Text(e) => e.print(out, ctx),
            FormatElement::Fraction(e) => e.print(out, ctx.local_millis, ctx.chronology),
            FormatElement::ZoneOffset(e) => e.print(out, ctx),
            FormatElement::ZoneName(e) => e.print(out, ctx),
            FormatElement::ZoneId(_) => ZoneId::print(out, ctx),
            FormatElement::Composite(e) => e.print(out, ctx),
            FormatElement::Alternation(_) => {}
            FormatElement::Affixed(e) => e.print(out, ctx),
        }
    }

    /// Prints from a value that carries only some fields. Zone elements
    /// print nothing.
    pub fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial, locale: &Locale) {
        match self {
            FormatElement::Literal(e) => e.print(out),
            FormatElement::Number(e) => e.print_partial(out, partial),
            FormatElement::TwoDigitYear(e) => e.print_partial(out, partial),
            FormatElement::Text(e) => e.print_partial(out, partial, locale),
            FormatElement::Fraction(e) => e.print_partial(out, partial),
            FormatElement::Composite(e) => e.print_partial(out, partial, locale),
            FormatElement::Affixed(e) => e.print_partial(out, partial, locale),
            FormatElement::ZoneOffset(_)
            | FormatElement::ZoneName(_)
            | FormatElement::ZoneId(_)
            | FormatElement::Alternation(_) => {}
        }
    }

    pub fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        match self {
            FormatElement::Literal(e) => e.parse(text, position),
            FormatElement::Number(e) => e.parse(bucket, text, position),
            FormatElement::TwoDigitYear(e) => e.parse(bucket, text, position),
            FormatElement::Text(e) => e.parse(bucket, text, position),
            FormatElement::Fraction(e) => e.parse(bucket, text, position),
            FormatElement::ZoneOffset(e) => e.parse(bucket, text, position),
            FormatElement::ZoneName(e) => e.parse(bucket, text, position),
            FormatElement::ZoneId(_) => ZoneId::parse(bucket, text, position),
            FormatElement::Composite(e) => e.parse(bucket, text, position),
            FormatElement::Alternation(e) => e.parse(bucket, text, position),
            FormatElement::Affixed(e) => e.parse(bucket, text, position),
        }
    }
}
