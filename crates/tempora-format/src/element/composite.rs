use tempora_chrono::{Locale, ReadablePartial};

use super::{FormatElement, ParseOutcome, PrintContext};
use crate::bucket::ParserBucket;

/// A sequence of elements run one after another.
///
/// Nested composites are flattened on construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composite {
    elements: Vec<FormatElement>,
}

impl Composite {
    pub fn new(elements: impl IntoIterator<Item = FormatElement>) -> Self {
        let mut flat = Vec::new();
        for element in elements {
            match element {
                FormatElement::Composite(inner) => flat.extend(inner.elements),
                other => flat.push(other),
            }
        }
        Self { elements: flat }
    }

    pub fn elements(&self) -> &[FormatElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn can_print(&self) -> bool {
        self.elements.iter().all(FormatElement::can_print)
    }

    pub(crate) fn can_parse(&self) -> bool {
        self.elements.iter().all(FormatElement::can_parse)
    }

    pub(crate) fn estimate_printed_length(&self) -> usize {
        self.elements.iter().map(FormatElement::estimate_printed_length).sum()
    }

    pub(crate) fn estimate_parsed_length(&self) -> usize {
        self.elements.iter().map(FormatElement::estimate_parsed_length).sum()
    }

    pub(crate) fn print(&self, out: &mut String, ctx: &PrintContext<'_>) {
        for element in &self.elements {
            element.print(out, ctx);
        }
    }

    pub(crate) fn print_partial(&self, out: &mut String, partial: &dyn ReadablePartial, locale: &Locale) {
        for element in &self.elements {
            element.print_partial(out, partial, locale);
        }
    }

    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let mut position = position;
        for element in &self.elements {
            position = element.parse(bucket, text, position)?;
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Literal;

    #[test]
    fn nested_composites_flatten() {
        let inner = Composite::new([
            FormatElement::Literal(Literal::new("a")),
            FormatElement::Literal(Literal::new("b")),
        ]);
        let outer = Composite::new([
            FormatElement::Composite(inner),
            FormatElement::Literal(Literal::new("c")),
        ]);
        assert_eq!(outer.len(), 3);
        assert_eq!(outer.estimate_printed_length(), 3);
    }
}
