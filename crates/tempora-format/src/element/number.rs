//! Decimal number elements.

use tempora_chrono::{DateTimeFieldType, ReadablePartial};

use super::{append_unknown, ParseOutcome, PrintContext};
use crate::bucket::ParserBucket;
use crate::numeric::{append_padded, calculate_digit_count, parse_digits, parse_two_digits};

/// Digit runs at least this long are parsed with overflow checking.
const CHECKED_PARSE_DIGITS: usize = 9;

/// A decimal field value.
///
/// Prints zero-padded to `min_printed_digits`; parses up to
/// `max_parsed_digits` digits, preceded by a sign when `signed`. A fixed-width
/// number must consume exactly its width and prints U+FFFD when the value
/// does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberElement {
    field: DateTimeFieldType,
    min_printed_digits: usize,
    max_parsed_digits: usize,
    signed: bool,
    fixed: bool,
}

impl NumberElement {
    /// A number printed with no padding.
    pub fn unpadded(field: DateTimeFieldType, max_parsed_digits: usize, signed: bool) -> Self {
        Self::padded(field, max_parsed_digits, signed, 1)
    }

    pub fn padded(
        field: DateTimeFieldType,
        max_parsed_digits: usize,
        signed: bool,
        min_printed_digits: usize,
    ) -> Self {
        Self {
            field,
            min_printed_digits,
            max_parsed_digits,
            signed,
            fixed: false,
        }
    }

    /// A number that is always exactly `digits` wide.
    pub fn fixed(field: DateTimeFieldType, digits: usize, signed: bool) -> Self {
        Self {
            fixed: true,
            ..Self::padded(field, digits, signed, digits)
        }
    }

    pub fn field(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn min_printed_digits(&self) -> usize {
        self.min_printed_digits
    }

    pub fn max_parsed_digits(&self) -> usize {
        self.max_parsed_digits
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub(crate) fn estimate_length(&self) -> usize {
        self.max_parsed_digits
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        match ctx.chronology.field(self.field).get(ctx.local_millis) {
            Ok(value) => self.append_value(out, value),
            Err(_) => append_unknown(out, self.min_printed_digits),
        }
    }

    pub(crate) fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial) {
        match partial.get(self.field) {
            Some(value) => self.append_value(out, value),
            None => append_unknown(out, self.min_printed_digits),
        }
    }

    fn append_value(&self, out: &mut String, value: i32) {
        if self.fixed && calculate_digit_count(i64::from(value)) > self.min_printed_digits {
            append_unknown(out, self.min_printed_digits);
        } else {
            append_padded(out, value, self.min_printed_digits);
        }
    }

    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let end = parse_number(bucket, self.field, self.max_parsed_digits, self.signed, text, position)?;
        if !self.fixed {
            return Ok(end);
        }
        let mut expected = position + self.max_parsed_digits;
        if end != expected {
            if self.signed && matches!(text.as_bytes().get(position), Some(b'-' | b'+')) {
                expected += 1;
            }
            if end > expected {
                return Err(expected + 1);
            } else if end < expected {
                return Err(end);
            }
        }
        Ok(end)
    }
}

/// Parses an optionally signed run of digits and saves it to `field`.
fn parse_number(
    bucket: &mut ParserBucket,
    field: DateTimeFieldType,
    max_digits: usize,
    signed: bool,
    text: &str,
    position: usize,
) -> ParseOutcome {
    let bytes = text.as_bytes();
    let available = bytes.len().saturating_sub(position);
    let mut limit = max_digits.min(available);
    let mut negative = false;
    let mut positive = false;
    let mut length = 0;
    while length < limit {
        let c = bytes[position + length];
        if length == 0 && signed && (c == b'-' || c == b'+') {
            negative = c == b'-';
            positive = c == b'+';
            let digit_follows = bytes
                .get(position + 1)
                .is_some_and(|next| next.is_ascii_digit());
            if length + 1 >= limit || !digit_follows {
                break;
            }
            length += 1;
            // The sign does not count towards the digit limit.
            limit = (limit + 1).min(available);
            continue;
        }
        if !c.is_ascii_digit() {
            break;
        }
        length += 1;
    }
    if length == 0 {
        return Err(position);
    }

    let end = position + length;
    let value = if length >= CHECKED_PARSE_DIGITS {
        let start = if positive { position + 1 } else { position };
        text[start..end].parse::<i32>().map_err(|_| position)?
    } else {
        let start = if negative || positive { position + 1 } else { position };
        let magnitude = parse_digits(&bytes[start..end]);
        if negative {
            -magnitude
        } else {
            magnitude
        }
    };
    bucket.save_field(field, value);
    Ok(end)
}

/// A year printed as two digits and parsed into the hundred-year window
/// centred on a pivot year.
///
/// When lenient, a signed value or a digit run that is not exactly two long
/// is saved as the literal year instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoDigitYear {
    field: DateTimeFieldType,
    pivot: i32,
    lenient: bool,
}

impl TwoDigitYear {
    pub fn new(field: DateTimeFieldType, pivot: i32, lenient: bool) -> Self {
        Self {
            field,
            pivot,
            lenient,
        }
    }

    pub fn field(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn pivot(&self) -> i32 {
        self.pivot
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        let year = ctx.chronology.field(self.field).get(ctx.local_millis).ok();
        append_two_digits(out, year);
    }

    pub(crate) fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial) {
        append_two_digits(out, partial.get(self.field));
    }

    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let bytes = text.as_bytes();
        let mut position = position;
        if self.lenient {
            let mut limit = bytes.len().saturating_sub(position);
            let mut has_sign = false;
            let mut negative = false;
            let mut length = 0;
            while length < limit {
                let c = bytes[position + length];
                if length == 0 && (c == b'-' || c == b'+') {
                    has_sign = true;
                    negative = c == b'-';
                    if negative {
                        length += 1;
                    } else {
                        position += 1;
                        limit -= 1;
                    }
                    continue;
                }
                if !c.is_ascii_digit() {
                    break;
                }
                length += 1;
            }
            if length == 0 || (negative && length == 1) {
                return Err(position);
            }
            if has_sign || length != 2 {
                let end = position + length;
                let value = if length >= CHECKED_PARSE_DIGITS {
                    text[position..end].parse::<i32>().map_err(|_| position)?
                } else {
                    let start = if negative { position + 1 } else { position };
                    let magnitude = parse_digits(&bytes[start..end]);
                    if negative {
                        -magnitude
                    } else {
                        magnitude
                    }
                };
                bucket.save_field(self.field, value);
                return Ok(end);
            }
        }

        let two_digits = bytes
            .get(position..position + 2)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_digit));
        if !two_digits {
            return Err(position);
        }
        let year = parse_two_digits(bytes, position);
        let pivot = bucket.pivot_year().unwrap_or(self.pivot);
        bucket.save_field(self.field, window_year(year, pivot));
        Ok(position + 2)
    }
}

/// Maps a two-digit year into `[pivot - 50, pivot + 49]`.
pub(crate) fn window_year(year: i32, pivot: i32) -> i32 {
    let low = pivot - 50;
    let t = if low >= 0 { low % 100 } else { 99 + ((low + 1) % 100) };
    year + low + if year < t { 100 } else { 0 } - t
}

fn append_two_digits(out: &mut String, year: Option<i32>) {
    match year {
        Some(year) => append_padded(out, year.unsigned_abs() % 100, 2),
        None => append_unknown(out, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::window_year;

    #[test]
    fn window_follows_pivot() {
        assert_eq!(window_year(49, 2000), 2049);
        assert_eq!(window_year(50, 2000), 1950);
        assert_eq!(window_year(0, 1975), 2000);
        assert_eq!(window_year(99, 1975), 1999);
    }

    #[test]
    fn window_handles_negative_low_bound() {
        // Window [-40, 59].
        assert_eq!(window_year(59, 10), 59);
        assert_eq!(window_year(60, 10), -40);
    }
}
