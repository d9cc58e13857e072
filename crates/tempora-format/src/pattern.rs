//! Compiles pattern strings such as `yyyy-MM-dd'T'HH:mm:ss.SSSZZ`.
//!
//! A run of one ASCII letter selects a field; the run length sets the
//! width. Any other character is literal text, and letters can be quoted
//! with `'...'`. Two quotes in a row stand for one quote.
//!
//! | Letter | Field                 | Letter | Field                      |
//! |--------|-----------------------|--------|----------------------------|
//! | `G`    | era text              | `a`    | halfday text               |
//! | `C`    | century of era        | `h`    | clock hour of halfday 1-12 |
//! | `Y`    | year of era           | `K`    | hour of halfday 0-11       |
//! | `x`    | weekyear              | `k`    | clock hour of day 1-24     |
//! | `w`    | week of weekyear      | `H`    | hour of day 0-23           |
//! | `e`    | day of week number    | `m`    | minute of hour             |
//! | `E`    | day of week text      | `s`    | second of minute           |
//! | `y`    | year                  | `S`    | fraction of second         |
//! | `D`    | day of year           | `z`    | zone name                  |
//! | `M`    | month (text if >= 3)  | `Z`    | offset (`Z`, `ZZ`) or id   |
//! | `d`    | day of month          |        |                            |

use std::iter::Peekable;
use std::str::Chars;

use chrono::{Datelike, Utc};
use log::debug;

use crate::builder::FormatterBuilder;
use crate::error::{FormatError, Result};
use crate::formatter::Formatter;

/// Years either side of a two-digit year's pivot.
const PIVOT_LAG: i32 = 30;

/// One lexical unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `count` repetitions of a field letter.
    Field { letter: char, count: usize },
    /// Unquoted punctuation and quoted text, quotes removed.
    Literal(String),
}

impl Token {
    /// Whether this token parses as digits, so a variable-width number
    /// before it must not run on into it.
    fn is_numeric(&self) -> bool {
        match *self {
            Token::Field { letter, count } => match letter {
                'c' | 'C' | 'x' | 'y' | 'Y' | 'd' | 'h' | 'H' | 'm' | 's' | 'S' | 'e' | 'D'
                | 'F' | 'w' | 'W' | 'k' | 'K' => true,
                'M' => count <= 2,
                _ => false,
            },
            Token::Literal(_) => false,
        }
    }
}

/// Splits a pattern into field and literal tokens.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            chars.next();
            let count = 1 + consume_same(&mut chars, c);
            tokens.push(Token::Field { letter: c, count });
        } else {
            tokens.push(Token::Literal(consume_literal(&mut chars)));
        }
    }
    tokens
}

fn consume_same(chars: &mut Peekable<Chars<'_>>, c: char) -> usize {
    let mut count = 0;
    while chars.next_if_eq(&c).is_some() {
        count += 1;
    }
    count
}

/// Reads literal text up to the next unquoted letter.
fn consume_literal(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut text = String::new();
    let mut quoted = false;
    while let Some(&c) = chars.peek() {
        if c == '\'' {
            chars.next();
            if chars.next_if_eq(&'\'').is_some() {
                text.push('\'');
            } else {
                quoted = !quoted;
            }
        } else if !quoted && c.is_ascii_alphabetic() {
            break;
        } else {
            text.push(c);
            chars.next();
        }
    }
    text
}

/// Compiles `pattern` into a formatter.
///
/// # Errors
/// `IllegalPattern` for an empty pattern or an unknown letter.
pub fn compile(pattern: &str) -> Result<Formatter> {
    if pattern.is_empty() {
        return Err(FormatError::IllegalPattern(
            "Invalid pattern specification".to_string(),
        ));
    }
    debug!("compiling pattern {pattern:?}");
    let mut builder = FormatterBuilder::new();
    parse_pattern_into(&mut builder, pattern)?;
    builder.to_formatter()
}

/// Appends the elements of `pattern` to `builder`.
///
/// # Errors
/// `IllegalPattern` for an unknown letter.
pub fn parse_pattern_into(builder: &mut FormatterBuilder, pattern: &str) -> Result<()> {
    let tokens = tokenize(pattern);
    for (i, token) in tokens.iter().enumerate() {
        let next_is_numeric = tokens.get(i + 1).is_some_and(Token::is_numeric);
        let (letter, count) = match token {
            Token::Literal(text) => {
                builder.append_literal(text.as_str());
                continue;
            }
            Token::Field { letter, count } => (*letter, *count),
        };
        match letter {
            'G' => {
                builder.append_era_text();
            }
            'C' => {
                builder.append_century_of_era(count, count)?;
            }
            'x' | 'y' | 'Y' if count == 2 => {
                // A lenient year would swallow the digits of a following number.
                let lenient = !next_is_numeric;
                if letter == 'x' {
                    builder.append_two_digit_weekyear(current_weekyear() - PIVOT_LAG, lenient);
                } else {
                    builder.append_two_digit_year(Utc::now().year() - PIVOT_LAG, lenient);
                }
            }
            'x' | 'y' | 'Y' => {
                let max_digits = if next_is_numeric { count } else { 9 };
                match letter {
                    'x' => builder.append_weekyear(count, max_digits)?,
                    'y' => builder.append_year(count, max_digits)?,
                    _ => builder.append_year_of_era(count, max_digits)?,
                };
            }
            'M' if count >= 4 => {
                builder.append_month_of_year_text();
            }
            'M' if count == 3 => {
                builder.append_month_of_year_short_text();
            }
            'M' => {
                builder.append_month_of_year(count)?;
            }
            'd' => {
                builder.append_day_of_month(count)?;
            }
            'a' => {
                builder.append_halfday_of_day_text();
            }
            'h' => {
                builder.append_clockhour_of_halfday(count)?;
            }
            'H' => {
                builder.append_hour_of_day(count)?;
            }
            'k' => {
                builder.append_clockhour_of_day(count)?;
            }
            'K' => {
                builder.append_hour_of_halfday(count)?;
            }
            'm' => {
                builder.append_minute_of_hour(count)?;
            }
            's' => {
                builder.append_second_of_minute(count)?;
            }
            'S' => {
                builder.append_fraction_of_second(count, count)?;
            }
            'e' => {
                builder.append_day_of_week(count)?;
            }
            'E' if count >= 4 => {
                builder.append_day_of_week_text();
            }
            'E' => {
                builder.append_day_of_week_short_text();
            }
            'D' => {
                builder.append_day_of_year(count)?;
            }
            'w' => {
                builder.append_week_of_weekyear(count)?;
            }
            'z' if count >= 4 => {
                builder.append_time_zone_name();
            }
            'z' => {
                builder.append_time_zone_short_name_with(None);
            }
            'Z' if count == 1 => {
                builder.append_time_zone_offset_with(None, Some("Z"), false, 2, 2)?;
            }
            'Z' if count == 2 => {
                builder.append_time_zone_offset_with(None, Some("Z"), true, 2, 2)?;
            }
            'Z' => {
                builder.append_time_zone_id();
            }
            _ => {
                let component: String = std::iter::repeat(letter).take(count).collect();
                return Err(FormatError::IllegalPattern(format!(
                    "Illegal pattern component: {component}"
                )));
            }
        }
    }
    Ok(())
}

fn current_weekyear() -> i32 {
    Utc::now().iso_week().year()
}
