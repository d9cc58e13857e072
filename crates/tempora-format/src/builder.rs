//! Step-by-step construction of formatters.
//!
//! A [`FormatterBuilder`] collects `(printer, parser)` pairs. Most appenders
//! add the same element as both halves; a few add only one, and a missing
//! half makes that whole side unavailable in the built [`Formatter`].
//!
//! ```
//! use tempora_format::FormatterBuilder;
//!
//! let formatter = FormatterBuilder::new()
//!     .append_year(4, 9)?
//!     .append_literal("-")
//!     .append_month_of_year(2)?
//!     .to_formatter()?;
//! assert_eq!(formatter.print_millis(0)?, "1970-01");
//! # Ok::<(), tempora_format::FormatError>(())
//! ```

use tempora_chrono::DateTimeFieldType;

use crate::element::{
    Affix, Affixed, Alternation, Composite, FormatElement, Fraction, Literal, NumberElement, TextField,
    TwoDigitYear, ZoneId, ZoneName, ZoneNameStyle, ZoneNames, ZoneOffset,
};
use crate::error::{FormatError, Result};
use crate::formatter::Formatter;
use crate::pattern;

type ElementPair = (Option<FormatElement>, Option<FormatElement>);

/// Accumulates elements and builds a [`Formatter`] from them.
#[derive(Debug, Clone, Default)]
pub struct FormatterBuilder {
    pairs: Vec<ElementPair>,
    /// Waiting for the next field element.
    prefix: Option<Affix>,
}

impl FormatterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every element appended so far.
    pub fn clear(&mut self) -> &mut Self {
        self.pairs.clear();
        self.prefix = None;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    // ------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------

    /// Builds a formatter from the elements appended so far. The builder can
    /// keep being used afterwards.
    ///
    /// # Errors
    /// `InvalidBuilder` when neither printing nor parsing is possible,
    /// `IllegalState` when a prefix has no field after it.
    pub fn to_formatter(&self) -> Result<Formatter> {
        self.check_no_pending_prefix()?;
        let (printer, parser) = self.halves();
        if printer.is_none() && parser.is_none() {
            return Err(FormatError::InvalidBuilder(
                "Both printing and parsing not supported".to_string(),
            ));
        }
        Ok(Formatter::from_parts(printer, parser))
    }

    /// # Errors
    /// `PrintingNotSupported` when an element cannot print.
    pub fn to_printer(&self) -> Result<FormatElement> {
        self.check_no_pending_prefix()?;
        self.halves().0.ok_or(FormatError::PrintingNotSupported)
    }

    /// # Errors
    /// `ParsingNotSupported` when an element cannot parse.
    pub fn to_parser(&self) -> Result<FormatElement> {
        self.check_no_pending_prefix()?;
        self.halves().1.ok_or(FormatError::ParsingNotSupported)
    }

    pub fn can_build_formatter(&self) -> bool {
        let (printer, parser) = self.halves();
        printer.is_some() || parser.is_some()
    }

    pub fn can_build_printer(&self) -> bool {
        self.halves().0.is_some()
    }

    pub fn can_build_parser(&self) -> bool {
        self.halves().1.is_some()
    }

    fn check_no_pending_prefix(&self) -> Result<()> {
        match self.prefix {
            Some(_) => Err(FormatError::IllegalState("No field to apply prefix to".to_string())),
            None => Ok(()),
        }
    }

    /// A single pair is used as is; several become one composite per side,
    /// and a side is dropped if any element lacks it.
    fn halves(&self) -> (Option<FormatElement>, Option<FormatElement>) {
        if let [(printer, parser)] = self.pairs.as_slice() {
            return (printer.clone(), parser.clone());
        }
        let printers: Option<Vec<FormatElement>> =
            self.pairs.iter().map(|(printer, _)| printer.clone()).collect();
        let parsers: Option<Vec<FormatElement>> =
            self.pairs.iter().map(|(_, parser)| parser.clone()).collect();
        let composite = |elements: Option<Vec<FormatElement>>| {
            elements
                .filter(|elements| !elements.is_empty())
                .map(|elements| FormatElement::Composite(Composite::new(elements)))
        };
        (composite(printers), composite(parsers))
    }

    // ------------------------------------------------------------------
    // Raw elements
    // ------------------------------------------------------------------

    /// Appends an element used for both printing and parsing, as far as it
    /// supports each. A pending prefix attaches to it if it is a field.
    pub fn append_element(&mut self, element: FormatElement) -> &mut Self {
        let element = match (element.field_type(), self.prefix.take()) {
            (Some(_), Some(prefix)) => {
                FormatElement::Affixed(Affixed::new(Some(prefix), element, None))
            }
            (_, prefix) => {
                self.prefix = prefix;
                element
            }
        };
        let printer = element.can_print().then(|| element.clone());
        let parser = element.can_parse().then_some(element);
        self.pairs.push((printer, parser));
        self
    }

    /// Appends a printer and parser pair; either may be absent.
    pub fn append_pair(
        &mut self,
        printer: Option<FormatElement>,
        parser: Option<FormatElement>,
    ) -> &mut Self {
        self.pairs.push((printer, parser));
        self
    }

    /// Appends everything `formatter` prints and parses.
    pub fn append_formatter(&mut self, formatter: &Formatter) -> &mut Self {
        self.append_pair(formatter.printer().cloned(), formatter.parser().cloned())
    }

    /// Appends a printer plus a choice of parsers tried at the same
    /// position, longest match winning. Only the last parser may be `None`,
    /// which makes the choice optional.
    ///
    /// # Errors
    /// `InvalidBuilder` when no parser is given, or a `None` is not last.
    pub fn append_alternatives(
        &mut self,
        printer: Option<FormatElement>,
        mut parsers: Vec<Option<FormatElement>>,
    ) -> Result<&mut Self> {
        match parsers.len() {
            0 => Err(FormatError::InvalidBuilder("No parsers supplied".to_string())),
            1 => match parsers.pop().flatten() {
                Some(parser) => Ok(self.append_pair(printer, Some(parser))),
                None => Err(FormatError::InvalidBuilder("No parser supplied".to_string())),
            },
            n => {
                if parsers[..n - 1].iter().any(Option::is_none) {
                    return Err(FormatError::InvalidBuilder(
                        "Incomplete parser array".to_string(),
                    ));
                }
                let alternation = FormatElement::Alternation(Alternation::new(parsers));
                Ok(self.append_pair(printer, Some(alternation)))
            }
        }
    }

    /// Appends a parser that may match nothing. Prints nothing.
    pub fn append_optional(&mut self, parser: FormatElement) -> &mut Self {
        let alternation = Alternation::new(vec![Some(parser), None]);
        self.append_pair(None, Some(FormatElement::Alternation(alternation)))
    }

    /// Appends text printed verbatim and matched ignoring case. Empty text
    /// appends nothing.
    pub fn append_literal(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        self.append_element(FormatElement::Literal(Literal::new(text)))
    }

    // ------------------------------------------------------------------
    // Affixes
    // ------------------------------------------------------------------

    /// Text printed and parsed before the next field appended. Literals in
    /// between do not consume it.
    pub fn append_prefix(&mut self, text: impl Into<String>) -> &mut Self {
        self.set_prefix(Affix::Simple(text.into()))
    }

    /// Like [`append_prefix`](Self::append_prefix), choosing `singular` when
    /// the field value is 1 and `plural` otherwise.
    pub fn append_plural_prefix(
        &mut self,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> &mut Self {
        self.set_prefix(Affix::Plural {
            singular: singular.into(),
            plural: plural.into(),
        })
    }

    fn set_prefix(&mut self, prefix: Affix) -> &mut Self {
        self.prefix = Some(prefix);
        self
    }

    /// Text printed and parsed after the field appended last.
    ///
    /// # Errors
    /// `IllegalState` unless the last element is a field without a suffix.
    pub fn append_suffix(&mut self, text: impl Into<String>) -> Result<&mut Self> {
        self.attach_suffix(Affix::Simple(text.into()))
    }

    /// Like [`append_suffix`](Self::append_suffix), choosing `singular` when
    /// the field value is 1 and `plural` otherwise, e.g. ` day` or ` days`.
    ///
    /// # Errors
    /// `IllegalState` unless the last element is a field without a suffix.
    pub fn append_plural_suffix(
        &mut self,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> Result<&mut Self> {
        self.attach_suffix(Affix::Plural {
            singular: singular.into(),
            plural: plural.into(),
        })
    }

    fn attach_suffix(&mut self, suffix: Affix) -> Result<&mut Self> {
        let field = match self.pairs.last() {
            Some((Some(printer), Some(parser))) if printer == parser => match printer {
                FormatElement::Affixed(affixed) if affixed.suffix().is_none() => {
                    Some(affixed.clone().with_suffix(suffix))
                }
                FormatElement::Affixed(_) => None,
                element if element.field_type().is_some() => {
                    Some(Affixed::new(None, element.clone(), Some(suffix)))
                }
                _ => None,
            },
            _ => None,
        };
        let field = field
            .ok_or_else(|| FormatError::IllegalState("No field to apply suffix to".to_string()))?;
        let element = FormatElement::Affixed(field);
        if let Some(last) = self.pairs.last_mut() {
            *last = (Some(element.clone()), Some(element));
        }
        Ok(self)
    }

    /// Compiles `pattern` and appends its elements.
    ///
    /// # Errors
    /// `IllegalPattern` when the pattern does not compile.
    pub fn append_pattern(&mut self, pattern: &str) -> Result<&mut Self> {
        pattern::parse_pattern_into(self, pattern)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------

    /// Appends a field as an unsigned decimal, printed with at least
    /// `min_digits` and parsed with at most `max_digits` digits.
    ///
    /// # Errors
    /// `InvalidBuilder` when `max_digits` ends up zero.
    pub fn append_decimal(
        &mut self,
        field: DateTimeFieldType,
        min_digits: usize,
        max_digits: usize,
    ) -> Result<&mut Self> {
        let element = decimal(field, min_digits, max_digits, false)?;
        Ok(self.append_element(element))
    }

    /// Like [`append_decimal`](Self::append_decimal), also accepting a sign.
    ///
    /// # Errors
    /// `InvalidBuilder` when `max_digits` ends up zero.
    pub fn append_signed_decimal(
        &mut self,
        field: DateTimeFieldType,
        min_digits: usize,
        max_digits: usize,
    ) -> Result<&mut Self> {
        let element = decimal(field, min_digits, max_digits, true)?;
        Ok(self.append_element(element))
    }

    /// Appends a field that prints and parses exactly `digits` digits.
    ///
    /// # Errors
    /// `InvalidBuilder` when `digits` is zero.
    pub fn append_fixed_decimal(&mut self, field: DateTimeFieldType, digits: usize) -> Result<&mut Self> {
        let element = fixed(field, digits, false)?;
        Ok(self.append_element(element))
    }

    /// # Errors
    /// `InvalidBuilder` when `digits` is zero.
    pub fn append_fixed_signed_decimal(
        &mut self,
        field: DateTimeFieldType,
        digits: usize,
    ) -> Result<&mut Self> {
        let element = fixed(field, digits, true)?;
        Ok(self.append_element(element))
    }

    /// Appends the fraction of `field`'s unit that has elapsed, e.g. the
    /// fraction of the current second for `SecondOfDay`.
    ///
    /// # Errors
    /// `InvalidBuilder` when `max_digits` ends up zero.
    pub fn append_fraction(
        &mut self,
        field: DateTimeFieldType,
        min_digits: usize,
        max_digits: usize,
    ) -> Result<&mut Self> {
        let max_digits = max_digits.max(min_digits);
        if max_digits == 0 {
            return Err(illegal_digits(max_digits));
        }
        Ok(self.append_element(FormatElement::Fraction(Fraction::new(field, min_digits, max_digits))))
    }

    pub fn append_fraction_of_second(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_fraction(DateTimeFieldType::SecondOfDay, min_digits, max_digits)
    }

    pub fn append_fraction_of_minute(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_fraction(DateTimeFieldType::MinuteOfDay, min_digits, max_digits)
    }

    pub fn append_fraction_of_hour(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_fraction(DateTimeFieldType::HourOfDay, min_digits, max_digits)
    }

    pub fn append_fraction_of_day(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_fraction(DateTimeFieldType::DayOfYear, min_digits, max_digits)
    }

    pub fn append_millis_of_second(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::MillisOfSecond, min_digits, 3)
    }

    pub fn append_millis_of_day(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::MillisOfDay, min_digits, 8)
    }

    pub fn append_second_of_minute(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::SecondOfMinute, min_digits, 2)
    }

    pub fn append_second_of_day(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::SecondOfDay, min_digits, 5)
    }

    pub fn append_minute_of_hour(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::MinuteOfHour, min_digits, 2)
    }

    pub fn append_minute_of_day(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::MinuteOfDay, min_digits, 4)
    }

    pub fn append_hour_of_day(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::HourOfDay, min_digits, 2)
    }

    pub fn append_clockhour_of_day(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::ClockhourOfDay, min_digits, 2)
    }

    pub fn append_hour_of_halfday(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::HourOfHalfday, min_digits, 2)
    }

    pub fn append_clockhour_of_halfday(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::ClockhourOfHalfday, min_digits, 2)
    }

    pub fn append_day_of_week(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::DayOfWeek, min_digits, 1)
    }

    pub fn append_day_of_month(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::DayOfMonth, min_digits, 2)
    }

    pub fn append_day_of_year(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::DayOfYear, min_digits, 3)
    }

    pub fn append_week_of_weekyear(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::WeekOfWeekyear, min_digits, 2)
    }

    pub fn append_weekyear(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_signed_decimal(DateTimeFieldType::Weekyear, min_digits, max_digits)
    }

    pub fn append_month_of_year(&mut self, min_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::MonthOfYear, min_digits, 2)
    }

    pub fn append_year(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_signed_decimal(DateTimeFieldType::Year, min_digits, max_digits)
    }

    /// Appends a two-digit year parsed into `[pivot - 50, pivot + 49]`. A
    /// lenient parser also takes any other digit count, or a sign, as the
    /// literal year.
    pub fn append_two_digit_year(&mut self, pivot: i32, lenient: bool) -> &mut Self {
        let element = TwoDigitYear::new(DateTimeFieldType::Year, pivot, lenient);
        self.append_element(FormatElement::TwoDigitYear(element))
    }

    pub fn append_two_digit_weekyear(&mut self, pivot: i32, lenient: bool) -> &mut Self {
        let element = TwoDigitYear::new(DateTimeFieldType::Weekyear, pivot, lenient);
        self.append_element(FormatElement::TwoDigitYear(element))
    }

    pub fn append_year_of_era(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::YearOfEra, min_digits, max_digits)
    }

    pub fn append_year_of_century(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_decimal(DateTimeFieldType::YearOfCentury, min_digits, max_digits)
    }

    pub fn append_century_of_era(&mut self, min_digits: usize, max_digits: usize) -> Result<&mut Self> {
        self.append_signed_decimal(DateTimeFieldType::CenturyOfEra, min_digits, max_digits)
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn append_text(&mut self, field: DateTimeFieldType) -> &mut Self {
        self.append_element(FormatElement::Text(TextField::new(field, false)))
    }

    pub fn append_short_text(&mut self, field: DateTimeFieldType) -> &mut Self {
        self.append_element(FormatElement::Text(TextField::new(field, true)))
    }

    pub fn append_era_text(&mut self) -> &mut Self {
        self.append_text(DateTimeFieldType::Era)
    }

    pub fn append_halfday_of_day_text(&mut self) -> &mut Self {
        self.append_text(DateTimeFieldType::HalfdayOfDay)
    }

    pub fn append_day_of_week_text(&mut self) -> &mut Self {
        self.append_text(DateTimeFieldType::DayOfWeek)
    }

    pub fn append_day_of_week_short_text(&mut self) -> &mut Self {
        self.append_short_text(DateTimeFieldType::DayOfWeek)
    }

    pub fn append_month_of_year_text(&mut self) -> &mut Self {
        self.append_text(DateTimeFieldType::MonthOfYear)
    }

    pub fn append_month_of_year_short_text(&mut self) -> &mut Self {
        self.append_short_text(DateTimeFieldType::MonthOfYear)
    }

    // ------------------------------------------------------------------
    // Zones
    // ------------------------------------------------------------------

    /// Appends the zone's long name. Print only.
    pub fn append_time_zone_name(&mut self) -> &mut Self {
        let element = ZoneName::new(ZoneNameStyle::Long, None);
        self.append_pair(Some(FormatElement::ZoneName(element)), None)
    }

    /// Appends the zone's long name, parsed by looking it up in `lookup`.
    pub fn append_time_zone_name_with(&mut self, lookup: ZoneNames) -> &mut Self {
        let element = ZoneName::new(ZoneNameStyle::Long, Some(lookup));
        self.append_element(FormatElement::ZoneName(element))
    }

    /// Appends the zone's short name. Print only.
    pub fn append_time_zone_short_name(&mut self) -> &mut Self {
        let element = ZoneName::new(ZoneNameStyle::Short, None);
        self.append_pair(Some(FormatElement::ZoneName(element)), None)
    }

    /// Appends the zone's short name, parsed through `lookup` or, when
    /// `None`, the built-in abbreviations such as `UTC` and `PST`.
    pub fn append_time_zone_short_name_with(&mut self, lookup: Option<ZoneNames>) -> &mut Self {
        let element = ZoneName::new(ZoneNameStyle::Short, lookup);
        self.append_element(FormatElement::ZoneName(element))
    }

    pub fn append_time_zone_id(&mut self) -> &mut Self {
        self.append_element(FormatElement::ZoneId(ZoneId))
    }

    /// Appends an offset such as `+01:30`. `zero_text`, when given, prints
    /// and parses in place of a zero offset.
    ///
    /// # Errors
    /// `InvalidBuilder` unless `0 < min_fields <= max_fields`.
    pub fn append_time_zone_offset(
        &mut self,
        zero_text: Option<&str>,
        show_separators: bool,
        min_fields: usize,
        max_fields: usize,
    ) -> Result<&mut Self> {
        self.append_time_zone_offset_with(zero_text, zero_text, show_separators, min_fields, max_fields)
    }

    /// Like [`append_time_zone_offset`](Self::append_time_zone_offset) with
    /// separate zero texts for printing and parsing.
    ///
    /// # Errors
    /// `InvalidBuilder` unless `0 < min_fields <= max_fields`.
    pub fn append_time_zone_offset_with(
        &mut self,
        zero_print_text: Option<&str>,
        zero_parse_text: Option<&str>,
        show_separators: bool,
        min_fields: usize,
        max_fields: usize,
    ) -> Result<&mut Self> {
        if min_fields == 0 || max_fields < min_fields {
            return Err(FormatError::InvalidBuilder(format!(
                "Illegal offset field counts: min {min_fields}, max {max_fields}"
            )));
        }
        let element = ZoneOffset::new(
            zero_print_text.map(str::to_string),
            zero_parse_text.map(str::to_string),
            show_separators,
            min_fields,
            max_fields,
        );
        Ok(self.append_element(FormatElement::ZoneOffset(element)))
    }
}

fn illegal_digits(digits: usize) -> FormatError {
    FormatError::InvalidBuilder(format!("Illegal number of digits: {digits}"))
}

fn decimal(
    field: DateTimeFieldType,
    min_digits: usize,
    max_digits: usize,
    signed: bool,
) -> Result<FormatElement> {
    let max_digits = max_digits.max(min_digits);
    if max_digits == 0 {
        return Err(illegal_digits(max_digits));
    }
    let element = if min_digits <= 1 {
        NumberElement::unpadded(field, max_digits, signed)
    } else {
        NumberElement::padded(field, max_digits, signed, min_digits)
    };
    Ok(FormatElement::Number(element))
}

fn fixed(field: DateTimeFieldType, digits: usize, signed: bool) -> Result<FormatElement> {
    if digits == 0 {
        return Err(illegal_digits(digits));
    }
    Ok(FormatElement::Number(NumberElement::fixed(field, digits, signed)))
}
