//! The immutable print/parse facade over a compiled element tree.
//!
//! A [`Formatter`] pairs an optional printer with an optional parser and
//! carries the settings both sides need: locale, an override chronology or
//! zone, the two-digit-year pivot and the default year. The `with_*`
//! methods return adjusted copies; the element tree itself is shared.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use tempora_chrono::{
    local_millis_to_naive, ChronologyRef, DateTime, DateTimeFieldType, DateTimeZone,
    IsoChronology, Locale, ReadablePartial,
};

use crate::bucket::ParserBucket;
use crate::cache::TextLookupCache;
use crate::element::{FormatElement, PrintContext};
use crate::error::{FormatError, Result};
use crate::settings::{FormatSettings, DEFAULT_YEAR};

/// Prints instants and partial values to text and parses text back.
///
/// # Example
/// ```
/// use tempora_format::Formatter;
///
/// let formatter = Formatter::for_pattern("yyyy-MM-dd HH:mm")?;
/// let millis = formatter.parse_millis("2024-02-29 13:45")?;
/// assert_eq!(formatter.print_millis(millis)?, "2024-02-29 13:45");
/// # Ok::<(), tempora_format::FormatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Formatter {
    printer: Option<Arc<FormatElement>>,
    parser: Option<Arc<FormatElement>>,
    locale: Locale,
    offset_parsed: bool,
    chronology: Option<ChronologyRef>,
    zone: Option<DateTimeZone>,
    pivot_year: Option<i32>,
    default_year: i32,
    text_cache: Option<Arc<TextLookupCache>>,
}

impl Formatter {
    pub(crate) fn from_parts(printer: Option<FormatElement>, parser: Option<FormatElement>) -> Self {
        Self {
            printer: printer.map(Arc::new),
            parser: parser.map(Arc::new),
            locale: Locale::english(),
            offset_parsed: false,
            chronology: None,
            zone: None,
            pivot_year: None,
            default_year: DEFAULT_YEAR,
            text_cache: None,
        }
    }

    /// Compiles a pattern such as `yyyy-MM-dd`.
    ///
    /// # Errors
    /// `IllegalPattern` when the pattern does not compile.
    pub fn for_pattern(pattern: &str) -> Result<Self> {
        crate::pattern::compile(pattern)
    }

    pub fn is_printer(&self) -> bool {
        self.printer.is_some()
    }

    pub fn is_parser(&self) -> bool {
        self.parser.is_some()
    }

    pub fn printer(&self) -> Option<&FormatElement> {
        self.printer.as_deref()
    }

    pub fn parser(&self) -> Option<&FormatElement> {
        self.parser.as_deref()
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            locale,
            ..self.clone()
        }
    }

    pub fn is_offset_parsed(&self) -> bool {
        self.offset_parsed
    }

    /// When set, a parsed offset becomes the zone of values returned by
    /// [`parse_date_time`](Self::parse_date_time) and
    /// [`parse_into`](Self::parse_into). Clears any override zone.
    pub fn with_offset_parsed(&self) -> Self {
        Self {
            offset_parsed: true,
            zone: None,
            ..self.clone()
        }
    }

    pub fn chronology(&self) -> Option<&ChronologyRef> {
        self.chronology.as_ref()
    }

    /// Prints and parses with `chronology` instead of the value's own.
    pub fn with_chronology(&self, chronology: ChronologyRef) -> Self {
        Self {
            chronology: Some(chronology),
            ..self.clone()
        }
    }

    pub fn zone(&self) -> Option<DateTimeZone> {
        self.zone
    }

    /// Prints in `zone` and returns parsed values in it. Clears
    /// offset-parsed mode.
    pub fn with_zone(&self, zone: DateTimeZone) -> Self {
        Self {
            offset_parsed: false,
            zone: Some(zone),
            ..self.clone()
        }
    }

    pub fn with_zone_utc(&self) -> Self {
        self.with_zone(DateTimeZone::UTC)
    }

    pub fn pivot_year(&self) -> Option<i32> {
        self.pivot_year
    }

    /// Overrides the pivot of every two-digit year element.
    pub fn with_pivot_year(&self, pivot_year: Option<i32>) -> Self {
        Self {
            pivot_year,
            ..self.clone()
        }
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    pub fn with_default_year(&self, default_year: i32) -> Self {
        Self {
            default_year,
            ..self.clone()
        }
    }

    /// Shares parsed month and weekday text tables through `cache`.
    pub fn with_text_cache(&self, cache: Arc<TextLookupCache>) -> Self {
        Self {
            text_cache: Some(cache),
            ..self.clone()
        }
    }

    /// Applies every setting in `settings`.
    ///
    /// # Errors
    /// `InvalidSettings` for a malformed locale tag or unknown zone.
    pub fn with_settings(&self, settings: &FormatSettings) -> Result<Self> {
        let mut formatter = self
            .with_pivot_year(settings.pivot_year)
            .with_default_year(settings.default_year);
        if let Some(locale) = settings.parsed_locale()? {
            formatter = formatter.with_locale(locale);
        }
        if let Some(zone) = settings.parsed_zone()? {
            formatter = formatter.with_zone(zone);
        }
        if settings.offset_parsed {
            formatter = formatter.with_offset_parsed();
        }
        Ok(formatter)
    }

    /// The input's chronology, or ISO in UTC, with this formatter's
    /// overrides applied.
    fn select_chronology(&self, chronology: Option<&ChronologyRef>) -> ChronologyRef {
        let mut selected = match (&self.chronology, chronology) {
            (Some(own), _) => Arc::clone(own),
            (None, Some(given)) => Arc::clone(given),
            (None, None) => IsoChronology::shared_utc(),
        };
        if let Some(zone) = self.zone {
            selected = selected.with_zone(zone);
        }
        selected
    }

    // ------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------

    fn require_printer(&self) -> Result<&FormatElement> {
        self.printer.as_deref().ok_or(FormatError::PrintingNotSupported)
    }

    fn require_parser(&self) -> Result<&FormatElement> {
        self.parser.as_deref().ok_or(FormatError::ParsingNotSupported)
    }

    /// Prints a millisecond instant in ISO, in the override zone or UTC.
    ///
    /// # Errors
    /// `PrintingNotSupported` when this formatter has no printer.
    pub fn print_millis(&self, instant: i64) -> Result<String> {
        let mut out = String::new();
        self.print_instant(&mut out, instant, None)?;
        Ok(out)
    }

    /// Prints `value` in its own chronology and zone unless overridden.
    ///
    /// # Errors
    /// `PrintingNotSupported` when this formatter has no printer.
    pub fn print_datetime(&self, value: &DateTime) -> Result<String> {
        let mut out = String::new();
        self.print_to(&mut out, value)?;
        Ok(out)
    }

    /// Appends the printed form of `value` to `out`.
    ///
    /// # Errors
    /// `PrintingNotSupported` when this formatter has no printer.
    pub fn print_to(&self, out: &mut String, value: &DateTime) -> Result<()> {
        self.print_instant(out, value.millis(), Some(value.chronology()))
    }

    /// Prints a value that carries only some fields. Zone elements print
    /// nothing and missing fields print as U+FFFD.
    ///
    /// # Errors
    /// `PrintingNotSupported` when this formatter has no printer.
    pub fn print_partial(&self, partial: &dyn ReadablePartial) -> Result<String> {
        let printer = self.require_printer()?;
        let mut out = String::with_capacity(printer.estimate_printed_length());
        printer.print_partial(&mut out, partial, &self.locale);
        Ok(out)
    }

    fn print_instant(&self, out: &mut String, instant: i64, chronology: Option<&ChronologyRef>) -> Result<()> {
        let printer = self.require_printer()?;
        let chronology = self.select_chronology(chronology);
        let mut zone = chronology.zone();
        let mut offset = zone.offset(instant);
        let local_millis = match instant.checked_add(i64::from(offset)) {
            Some(local) => local,
            None => {
                zone = DateTimeZone::UTC;
                offset = 0;
                instant
            }
        };
        let utc = chronology.with_utc();
        let ctx = PrintContext {
            local_millis,
            chronology: utc.as_ref(),
            display_offset: offset,
            display_zone: Some(zone),
            locale: &self.locale,
        };
        out.reserve(printer.estimate_printed_length());
        printer.print(out, &ctx);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------

    /// A fresh bucket carrying this formatter's parse settings, resolving
    /// onto `instant_local` in `chronology`.
    pub fn new_bucket(&self, instant_local: i64, chronology: &ChronologyRef) -> ParserBucket {
        let bucket = ParserBucket::new(
            instant_local,
            chronology,
            self.locale.clone(),
            self.pivot_year,
            self.default_year,
        );
        match &self.text_cache {
            Some(cache) => bucket.with_text_cache(Arc::clone(cache)),
            None => bucket,
        }
    }

    /// Runs the parser at `position` and leaves the result in `bucket`
    /// without resolving it.
    ///
    /// # Errors
    /// `ParsingNotSupported`, or `InvalidFormat` at the failure position.
    pub fn parse_into_bucket(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> Result<usize> {
        let parser = self.require_parser()?;
        check_position(text, position)?;
        parser
            .parse(bucket, text, position)
            .map_err(|at| FormatError::invalid_format(text, at))
    }

    /// Parses the whole of `text` into a millisecond instant.
    ///
    /// # Errors
    /// `ParsingNotSupported`, `InvalidFormat` when the text does not match
    /// in full, `IllegalFieldValue` or `IllegalInstant` when it does not
    /// resolve.
    pub fn parse_millis(&self, text: &str) -> Result<i64> {
        let parser = self.require_parser()?;
        let chronology = self.select_chronology(None);
        let mut bucket = self.new_bucket(0, &chronology);
        bucket.parse_millis(parser, text)
    }

    /// Parses the whole of `text` into a [`DateTime`]. The result is in the
    /// override zone if set, else in the parsed offset when offset-parsed
    /// mode is on, else in the parsed zone.
    ///
    /// # Errors
    /// As for [`parse_millis`](Self::parse_millis).
    pub fn parse_date_time(&self, text: &str) -> Result<DateTime> {
        let parser = self.require_parser()?;
        let chronology = self.select_chronology(None);
        let mut bucket = self.new_bucket(0, &chronology);
        let millis = bucket.parse_millis(parser, text)?;
        let chronology = self.resolved_chronology(&chronology, &bucket, self.offset_parsed)?;
        let value = DateTime::new(millis, chronology);
        Ok(match self.zone {
            Some(zone) => value.with_zone(zone),
            None => value,
        })
    }

    /// Parses the whole of `text` into a wall-clock date-time, in the
    /// parsed zone or offset when there is one.
    ///
    /// # Errors
    /// As for [`parse_millis`](Self::parse_millis).
    pub fn parse_local_date_time(&self, text: &str) -> Result<NaiveDateTime> {
        let parser = self.require_parser()?;
        let chronology = self.select_chronology(None).with_utc();
        let mut bucket = self.new_bucket(0, &chronology);
        let millis = bucket.parse_millis(parser, text)?;
        let chronology = self.resolved_chronology(&chronology, &bucket, true)?;
        let offset = chronology.zone().offset(millis);
        Ok(local_millis_to_naive(millis + i64::from(offset))?)
    }

    /// # Errors
    /// As for [`parse_millis`](Self::parse_millis).
    pub fn parse_local_date(&self, text: &str) -> Result<NaiveDate> {
        Ok(self.parse_local_date_time(text)?.date())
    }

    /// # Errors
    /// As for [`parse_millis`](Self::parse_millis).
    pub fn parse_local_time(&self, text: &str) -> Result<NaiveTime> {
        Ok(self.parse_local_date_time(text)?.time())
    }

    /// Parses `text` from `position` onto `target`. Fields the text does not
    /// mention keep the target's values, and a missing year defaults to the
    /// target's year. `target` is only changed when parsing succeeds.
    ///
    /// Returns the position after the parsed text, which need not be the
    /// end.
    ///
    /// # Errors
    /// As for [`parse_millis`](Self::parse_millis).
    pub fn parse_into(&self, target: &mut DateTime, text: &str, position: usize) -> Result<usize> {
        let parser = self.require_parser()?;
        check_position(text, position)?;
        let default_year = target.get(DateTimeFieldType::Year)?;
        let instant_local = target.local_millis();
        let chronology = self.select_chronology(Some(target.chronology()));

        let mut bucket = ParserBucket::new(
            instant_local,
            &chronology,
            self.locale.clone(),
            self.pivot_year,
            default_year,
        );
        if let Some(cache) = &self.text_cache {
            bucket = bucket.with_text_cache(Arc::clone(cache));
        }
        let end = parser
            .parse(&mut bucket, text, position)
            .map_err(|at| FormatError::invalid_format(text, at))?;
        let millis = bucket.compute_millis(false, Some(text))?;
        let chronology = self.resolved_chronology(&chronology, &bucket, self.offset_parsed)?;
        let mut value = DateTime::new(millis, chronology);
        if let Some(zone) = self.zone {
            value = value.with_zone(zone);
        }
        *target = value;
        Ok(end)
    }

    /// The chronology a parsed value is returned in: the parsed offset when
    /// `use_offset` and one was parsed, else the parsed zone.
    fn resolved_chronology(
        &self,
        chronology: &ChronologyRef,
        bucket: &ParserBucket,
        use_offset: bool,
    ) -> Result<ChronologyRef> {
        match (bucket.offset(), bucket.zone()) {
            (Some(offset), _) if use_offset => {
                let zone = DateTimeZone::for_offset_millis(offset)?;
                debug!("parsed offset {offset} becomes zone {zone}");
                Ok(chronology.with_zone(zone))
            }
            (_, Some(zone)) => Ok(chronology.with_zone(zone)),
            _ => Ok(Arc::clone(chronology)),
        }
    }
}

fn check_position(text: &str, position: usize) -> Result<()> {
    if position > text.len() || !text.is_char_boundary(position) {
        return Err(FormatError::invalid_format(text, position));
    }
    Ok(())
}
