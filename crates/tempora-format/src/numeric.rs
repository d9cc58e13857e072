//! Integer to text conversion with zero padding, plus the digit helpers the
//! numeric parsers share.
//!
//! Signs never count towards the padding width: `-7` padded to 3 is `-007`.
//! Every conversion goes through the unsigned magnitude, so `i32::MIN` and
//! `i64::MIN` need no special casing.

/// Appends `value` in decimal, left-padded with `'0'` to at least `size`
/// digits.
///
/// # Example
/// ```
/// use tempora_format::numeric::append_padded;
///
/// let mut out = String::new();
/// append_padded(&mut out, -42, 4);
/// assert_eq!(out, "-0042");
/// ```
pub fn append_padded(out: &mut String, value: impl Into<i64>, size: usize) {
    let value = value.into();
    if value < 0 {
        out.push('-');
    }
    let digits = value.unsigned_abs().to_string();
    for _ in digits.len()..size {
        out.push('0');
    }
    out.push_str(&digits);
}

/// Appends `value` in decimal with no padding.
pub fn append_unpadded(out: &mut String, value: impl Into<i64>) {
    let value = value.into();
    if value < 0 {
        out.push('-');
    }
    out.push_str(&value.unsigned_abs().to_string());
}

/// Number of characters `value` prints as, sign included.
pub fn calculate_digit_count(value: i64) -> usize {
    let sign = usize::from(value < 0);
    let mut magnitude = value.unsigned_abs();
    let mut digits = 1;
    while magnitude >= 10 {
        magnitude /= 10;
        digits += 1;
    }
    digits + sign
}

/// Reads two ASCII digits at `position` without general parsing.
///
/// The caller has already checked that both bytes are digits.
pub fn parse_two_digits(text: &[u8], position: usize) -> i32 {
    let tens = i32::from(text[position] - b'0');
    tens * 10 + i32::from(text[position + 1] - b'0')
}

/// Accumulates a run of at most eight known-good ASCII digits.
pub(crate) fn parse_digits(digits: &[u8]) -> i32 {
    digits
        .iter()
        .fold(0i32, |value, b| value * 10 + i32::from(b - b'0'))
}

/// Count of consecutive ASCII digits at `position`, capped at `amount`.
pub(crate) fn digit_count(text: &[u8], position: usize, amount: usize) -> usize {
    text.get(position..)
        .unwrap_or_default()
        .iter()
        .take(amount)
        .take_while(|b| b.is_ascii_digit())
        .count()
}
