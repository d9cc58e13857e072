//! Prefix and suffix text around field elements.

use tempora_chrono::{Locale, ReadablePartial};

use super::literal::match_ignoring_case;
use super::{FormatElement, ParseOutcome, PrintContext};
use crate::bucket::ParserBucket;

/// Text printed before or after a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affix {
    Simple(String),
    /// `singular` when the field value is exactly 1, otherwise `plural`.
    Plural { singular: String, plural: String },
}

impl Affix {
    fn text_for(&self, value: Option<i32>) -> &str {
        match self {
            Affix::Simple(text) => text,
            Affix::Plural { singular, .. } if value == Some(1) => singular,
            Affix::Plural { plural, .. } => plural,
        }
    }

    fn max_length(&self) -> usize {
        match self {
            Affix::Simple(text) => text.chars().count(),
            Affix::Plural { singular, plural } => {
                singular.chars().count().max(plural.chars().count())
            }
        }
    }

    /// Matches either form ignoring case, the longer one first so `days`
    /// is not cut short at `day`.
    fn parse(&self, text: &str, position: usize) -> ParseOutcome {
        match self {
            Affix::Simple(expected) => match_ignoring_case(expected, text, position),
            Affix::Plural { singular, plural } => {
                let (longer, shorter) = if plural.len() >= singular.len() {
                    (plural, singular)
                } else {
                    (singular, plural)
                };
                match_ignoring_case(longer, text, position)
                    .or_else(|_| match_ignoring_case(shorter, text, position))
            }
        }
    }
}

/// A field element wrapped in an optional prefix and suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct Affixed {
    prefix: Option<Affix>,
    field: Box<FormatElement>,
    suffix: Option<Affix>,
}

impl Affixed {
    pub fn new(prefix: Option<Affix>, field: FormatElement, suffix: Option<Affix>) -> Self {
        Self {
            prefix,
            field: Box::new(field),
            suffix,
        }
    }

    pub fn prefix(&self) -> Option<&Affix> {
        self.prefix.as_ref()
    }

    pub fn field(&self) -> &FormatElement {
        &self.field
    }

    pub fn suffix(&self) -> Option<&Affix> {
        self.suffix.as_ref()
    }

    pub(crate) fn with_suffix(mut self, suffix: Affix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    fn affix_length(&self) -> usize {
        self.prefix.as_ref().map_or(0, Affix::max_length)
            + self.suffix.as_ref().map_or(0, Affix::max_length)
    }

    pub(crate) fn estimate_printed_length(&self) -> usize {
        self.affix_length() + self.field.estimate_printed_length()
    }

    pub(crate) fn estimate_parsed_length(&self) -> usize {
        self.affix_length() + self.field.estimate_parsed_length()
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        let value = self
            .field
            .field_type()
            .and_then(|field| ctx.chronology.field(field).get(ctx.local_millis).ok());
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix.text_for(value));
        }
        self.field.print(out, ctx);
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix.text_for(value));
        }
    }

    pub(crate) fn print_partial(
        &self,
        out: &mut String,
        partial: &dyn ReadablePartial,
        locale: &Locale,
    ) {
        let value = self.field.field_type().and_then(|field| partial.get(field));
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix.text_for(value));
        }
        self.field.print_partial(out, partial, locale);
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix.text_for(value));
        }
    }

    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let mut position = position;
        if let Some(prefix) = &self.prefix {
            position = prefix.parse(text, position)?;
        }
        position = self.field.parse(bucket, text, position)?;
        if let Some(suffix) = &self.suffix {
            position = suffix.parse(text, position)?;
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days() -> Affix {
        Affix::Plural {
            singular: " day".to_string(),
            plural: " days".to_string(),
        }
    }

    #[test]
    fn plural_form_follows_value() {
        assert_eq!(days().text_for(Some(1)), " day");
        assert_eq!(days().text_for(Some(2)), " days");
        assert_eq!(days().text_for(None), " days");
    }

    #[test]
    fn plural_parse_prefers_longer_form() {
        assert_eq!(days().parse("3 days", 1), Ok(6));
        assert_eq!(days().parse("1 DAY", 1), Ok(5));
        assert_eq!(days().parse("1 week", 1), Err(1));
    }
}
