//! Zone elements: numeric offsets, display names and region ids.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use tempora_chrono::{DateTimeZone, DEFAULT_ZONE_NAMES};

use super::{ParseOutcome, PrintContext};
use crate::bucket::ParserBucket;
use crate::numeric::{append_padded, digit_count, parse_two_digits};

const MILLIS_PER_HOUR: i32 = 3_600_000;
const MILLIS_PER_MINUTE: i32 = 60_000;
const MILLIS_PER_SECOND: i32 = 1_000;

/// Name to zone table used when parsing zone names.
pub type ZoneNames = Arc<BTreeMap<String, DateTimeZone>>;

/// An offset such as `+05:30`, or fixed text for a zero offset.
///
/// `min_fields` and `max_fields` count hour, minute, second and millisecond
/// groups: with `(2, 4)` the minutes always print, seconds and millis only
/// when non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOffset {
    zero_print_text: Option<String>,
    zero_parse_text: Option<String>,
    show_separators: bool,
    min_fields: usize,
    max_fields: usize,
}

impl ZoneOffset {
    /// Field counts are clamped to `1 <= min_fields <= max_fields <= 4`;
    /// the builder rejects counts outside that range instead.
    pub fn new(
        zero_print_text: Option<String>,
        zero_parse_text: Option<String>,
        show_separators: bool,
        min_fields: usize,
        max_fields: usize,
    ) -> Self {
        let min_fields = min_fields.clamp(1, 4);
        let max_fields = max_fields.clamp(min_fields, 4);
        Self {
            zero_print_text,
            zero_parse_text,
            show_separators,
            min_fields,
            max_fields,
        }
    }

    pub(crate) fn estimate_printed_length(&self) -> usize {
        let mut estimate = (1 + self.min_fields) << 1;
        if self.show_separators {
            estimate += self.min_fields - 1;
        }
        match &self.zero_print_text {
            Some(text) => estimate.max(text.chars().count()),
            None => estimate,
        }
    }

    pub(crate) fn estimate_parsed_length(&self) -> usize {
        self.estimate_printed_length()
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        if ctx.display_zone.is_none() {
            return;
        }
        let mut offset = ctx.display_offset;
        if offset == 0 {
            if let Some(text) = &self.zero_print_text {
                out.push_str(text);
                return;
            }
        }
        // Offsets stay within a day, so negation cannot overflow.
        if offset >= 0 {
            out.push('+');
        } else {
            out.push('-');
            offset = -offset;
        }

        let hours = offset / MILLIS_PER_HOUR;
        append_padded(out, hours, 2);
        if self.max_fields == 1 {
            return;
        }
        offset -= hours * MILLIS_PER_HOUR;
        if offset == 0 && self.min_fields <= 1 {
            return;
        }

        let minutes = offset / MILLIS_PER_MINUTE;
        if self.show_separators {
            out.push(':');
        }
        append_padded(out, minutes, 2);
        if self.max_fields == 2 {
            return;
        }
        offset -= minutes * MILLIS_PER_MINUTE;
        if offset == 0 && self.min_fields <= 2 {
            return;
        }

        let seconds = offset / MILLIS_PER_SECOND;
        if self.show_separators {
            out.push(':');
        }
        append_padded(out, seconds, 2);
        if self.max_fields == 3 {
            return;
        }
        offset -= seconds * MILLIS_PER_SECOND;
        if offset == 0 && self.min_fields <= 3 {
            return;
        }

        if self.show_separators {
            out.push('.');
        }
        append_padded(out, offset, 3);
    }

    /// Accepts the zero text, or a sign followed by `hh`, `hhmm`, `hhmmss`,
    /// `hhmmssSSS`, `hh:mm`, `hh:mm:ss` or `hh:mm:ss.SSS`.
    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let bytes = text.as_bytes();
        let mut limit = bytes.len().saturating_sub(position);

        if let Some(zero) = &self.zero_parse_text {
            if zero.is_empty() {
                let sign_follows = matches!(bytes.get(position), Some(b'-' | b'+'));
                if !sign_follows {
                    bucket.set_offset(Some(0));
                    return Ok(position);
                }
            } else if starts_with_ignore_case(text, position, zero) {
                bucket.set_offset(Some(0));
                return Ok(position + zero.len());
            }
        }

        if limit <= 1 {
            return Err(position);
        }
        let negative = match bytes[position] {
            b'-' => true,
            b'+' => false,
            _ => return Err(position),
        };
        limit -= 1;
        let mut position = position + 1;

        if digit_count(bytes, position, 2) < 2 {
            return Err(position);
        }
        let hours = parse_two_digits(bytes, position);
        if hours > 23 {
            return Err(position);
        }
        let mut offset = hours * MILLIS_PER_HOUR;
        limit -= 2;
        position += 2;

        'groups: {
            if limit == 0 {
                break 'groups;
            }
            let expect_separators = match bytes[position] {
                b':' => {
                    limit -= 1;
                    position += 1;
                    true
                }
                c if c.is_ascii_digit() => false,
                _ => break 'groups,
            };

            let count = digit_count(bytes, position, 2);
            if count == 0 && !expect_separators {
                break 'groups;
            } else if count < 2 {
                return Err(position);
            }
            let minutes = parse_two_digits(bytes, position);
            if minutes > 59 {
                return Err(position);
            }
            offset += minutes * MILLIS_PER_MINUTE;
            limit = limit.saturating_sub(2);
            position += 2;

            if limit == 0 {
                break 'groups;
            }
            if expect_separators {
                if bytes[position] != b':' {
                    break 'groups;
                }
                limit -= 1;
                position += 1;
            }
            let count = digit_count(bytes, position, 2);
            if count == 0 && !expect_separators {
                break 'groups;
            } else if count < 2 {
                return Err(position);
            }
            let seconds = parse_two_digits(bytes, position);
            if seconds > 59 {
                return Err(position);
            }
            offset += seconds * MILLIS_PER_SECOND;
            limit = limit.saturating_sub(2);
            position += 2;

            if limit == 0 {
                break 'groups;
            }
            if expect_separators {
                if bytes[position] != b'.' && bytes[position] != b',' {
                    break 'groups;
                }
                position += 1;
            }
            let count = digit_count(bytes, position, 3);
            if count == 0 && !expect_separators {
                break 'groups;
            } else if count < 1 {
                return Err(position);
            }
            for weight in [100, 10, 1].into_iter().take(count) {
                offset += i32::from(bytes[position] - b'0') * weight;
                position += 1;
            }
        }

        bucket.set_offset(Some(if negative { -offset } else { offset }));
        Ok(position)
    }
}

fn starts_with_ignore_case(text: &str, position: usize, prefix: &str) -> bool {
    text.get(position..)
        .and_then(|rest| rest.get(..prefix.len()))
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Whether a zone name element prints the long or the short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneNameStyle {
    Long,
    Short,
}

/// A zone's display name. Parsing matches the longest name in the lookup,
/// or in the default short-name table when none was given.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneName {
    style: ZoneNameStyle,
    lookup: Option<ZoneNames>,
}

impl ZoneName {
    pub fn new(style: ZoneNameStyle, lookup: Option<ZoneNames>) -> Self {
        Self { style, lookup }
    }

    pub fn style(&self) -> ZoneNameStyle {
        self.style
    }

    pub(crate) fn estimate_length(&self) -> usize {
        match self.style {
            ZoneNameStyle::Short => 4,
            ZoneNameStyle::Long => 20,
        }
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        let Some(zone) = ctx.display_zone else {
            return;
        };
        let instant = ctx.instant();
        match self.style {
            ZoneNameStyle::Long => out.push_str(&zone.name(instant)),
            ZoneNameStyle::Short => out.push_str(&zone.short_name(instant)),
        }
    }

    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let rest = text.get(position..).ok_or(position)?;
        let best = match &self.lookup {
            Some(lookup) => longest_prefix(rest, lookup.iter().map(|(name, zone)| (name.as_str(), *zone))),
            None => longest_prefix(rest, DEFAULT_ZONE_NAMES.iter().copied()),
        };
        let (name, zone) = best.ok_or(position)?;
        bucket.set_zone(zone);
        Ok(position + name.len())
    }
}

fn longest_prefix<'a>(
    text: &str,
    names: impl Iterator<Item = (&'a str, DateTimeZone)>,
) -> Option<(&'a str, DateTimeZone)> {
    names
        .filter(|(name, _)| text.starts_with(name))
        .fold(None, |best, candidate| match best {
            Some((name, _)) if name.len() >= candidate.0.len() => best,
            _ => Some(candidate),
        })
}

/// A zone's region id, such as `Europe/Paris`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneId;

impl ZoneId {
    pub(crate) fn estimate_length() -> usize {
        ZoneIdIndex::get().max_length
    }

    pub(crate) fn print(out: &mut String, ctx: &PrintContext<'_>) {
        if let Some(zone) = ctx.display_zone {
            out.push_str(&zone.id());
        }
    }

    /// Finds the `Prefix/` group first, then the longest id suffix in it.
    pub(crate) fn parse(bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let index = ZoneIdIndex::get();
        let rest = text.get(position..).ok_or(position)?;
        let window = rest.len().min(index.max_prefix_length);
        let (prefix, candidates) = match rest.as_bytes()[..window].iter().position(|b| *b == b'/') {
            Some(slash) => {
                let prefix = &rest[..=slash];
                let group = index.grouped.get(prefix).ok_or(position)?;
                (prefix, group)
            }
            None => ("", &index.base),
        };
        let tail = &rest[prefix.len()..];
        let best = candidates
            .iter()
            .filter(|suffix| tail.starts_with(**suffix))
            .max_by_key(|suffix| suffix.len())
            .ok_or(position)?;
        let zone = DateTimeZone::for_id(&format!("{prefix}{best}")).map_err(|_| position)?;
        bucket.set_zone(zone);
        Ok(position + prefix.len() + best.len())
    }
}

/// Every known zone id, grouped by the text up to and including the first
/// slash.
struct ZoneIdIndex {
    base: Vec<&'static str>,
    grouped: HashMap<&'static str, Vec<&'static str>>,
    max_prefix_length: usize,
    max_length: usize,
}

impl ZoneIdIndex {
    fn get() -> &'static ZoneIdIndex {
        static INDEX: OnceLock<ZoneIdIndex> = OnceLock::new();
        INDEX.get_or_init(|| {
            let mut index = ZoneIdIndex {
                base: Vec::new(),
                grouped: HashMap::new(),
                max_prefix_length: 0,
                max_length: 0,
            };
            for id in DateTimeZone::available_ids() {
                index.max_length = index.max_length.max(id.len());
                match id.find('/') {
                    Some(slash) => {
                        let (prefix, suffix) = id.split_at(slash + 1);
                        index.max_prefix_length = index.max_prefix_length.max(prefix.len());
                        index.grouped.entry(prefix).or_default().push(suffix);
                    }
                    None => index.base.push(id),
                }
            }
            index
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_groups_ids_by_prefix() {
        let index = ZoneIdIndex::get();
        let america = index.grouped.get("America/").unwrap();
        assert!(america.contains(&"New_York"));
        assert!(america.contains(&"Argentina/Buenos_Aires"));
        assert!(index.base.contains(&"UTC"));
        assert!(index.max_prefix_length >= "Antarctica/".len());
    }

    #[test]
    fn longest_prefix_prefers_longer_names() {
        let best = longest_prefix("UTC+1", DEFAULT_ZONE_NAMES.iter().copied());
        assert_eq!(best.map(|(name, _)| name), Some("UTC"));
    }
}
