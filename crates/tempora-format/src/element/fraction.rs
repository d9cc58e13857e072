use tempora_chrono::{Chronology, DateTimeFieldType, PreciseField, ReadablePartial};

use super::{append_unknown, ParseOutcome};
use crate::bucket::ParserBucket;

/// Most digits a fraction can carry without overflowing `i64` millis.
const MAX_FRACTION_DIGITS: usize = 18;

/// The elapsed part of a field's unit written as decimal digits, so `"23"`
/// under `secondOfDay` means 0.23 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    field: DateTimeFieldType,
    min_digits: usize,
    max_digits: usize,
}

impl Fraction {
    pub fn new(field: DateTimeFieldType, min_digits: usize, max_digits: usize) -> Self {
        Self {
            field,
            min_digits,
            max_digits: max_digits.min(MAX_FRACTION_DIGITS),
        }
    }

    pub fn field(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn min_digits(&self) -> usize {
        self.min_digits
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    pub(crate) fn estimate_length(&self) -> usize {
        self.max_digits
    }

    pub(crate) fn print(&self, out: &mut String, local_millis: i64, chronology: &dyn Chronology) {
        let field = chronology.field(self.field);
        let Ok(fraction) = field.remainder(local_millis) else {
            append_unknown(out, self.min_digits);
            return;
        };
        if fraction == 0 {
            out.extend(std::iter::repeat('0').take(self.min_digits));
            return;
        }

        let unit = field.duration_field().unit_millis();
        let (scaled, max_digits) = self.scale(fraction, unit);
        let digits_text = scaled.to_string();
        let mut min_digits = self.min_digits;
        let mut digits = max_digits;
        let mut length = digits_text.len();
        while length < digits {
            out.push('0');
            min_digits = min_digits.saturating_sub(1);
            digits -= 1;
        }
        // Drop trailing zeros, keeping at least `min_digits` and one digit.
        while min_digits < digits && length > 1 && digits_text.as_bytes()[length - 1] == b'0' {
            digits -= 1;
            length -= 1;
        }
        out.push_str(&digits_text[..length]);
    }

    pub(crate) fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial) {
        let chronology = partial.chronology();
        match chronology.set_partial(partial, 0) {
            Ok(millis) => self.print(out, millis, chronology.as_ref()),
            Err(_) => append_unknown(out, self.min_digits),
        }
    }

    /// Scales `fraction` of a `unit` to `10^digits`, reducing `digits` until
    /// `unit * 10^digits` fits in an `i64`.
    fn scale(&self, fraction: i64, unit: i64) -> (i64, usize) {
        let mut digits = self.max_digits;
        loop {
            let scalar = 10i64.pow(digits as u32);
            if unit.checked_mul(scalar).is_some() || digits == 0 {
                return (fraction * scalar / unit.max(1), digits);
            }
            digits -= 1;
        }
    }

    /// Reads up to `max_digits` digits and saves the millis they represent
    /// within the field's unit.
    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let unit = bucket.chronology().field(self.field).duration_field();
        let bytes = text.as_bytes();
        let limit = self.max_digits.min(bytes.len().saturating_sub(position));
        let mut value: i64 = 0;
        let mut n = unit.unit_millis() * 10;
        let mut length = 0;
        while length < limit {
            let c = bytes[position + length];
            if !c.is_ascii_digit() {
                break;
            }
            length += 1;
            let nn = n / 10;
            value += i64::from(c - b'0') * nn;
            n = nn;
        }
        value /= 10;
        if length == 0 {
            return Err(position);
        }
        let value = i32::try_from(value).map_err(|_| position)?;
        bucket.save_precise(PreciseField::millis_of(unit), value);
        Ok(position + length)
    }
}
