use super::{FormatElement, ParseOutcome};
use crate::bucket::ParserBucket;

/// Tries several parsers at the same position and keeps the one that
/// consumed the most text.
///
/// A `None` entry, only ever last, makes the whole alternation optional:
/// when no parser matches, parsing succeeds without consuming anything.
/// Alternations cannot print.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternation {
    parsers: Vec<Option<FormatElement>>,
}

impl Alternation {
    pub fn new(parsers: Vec<Option<FormatElement>>) -> Self {
        Self { parsers }
    }

    pub fn parsers(&self) -> &[Option<FormatElement>] {
        &self.parsers
    }

    pub(crate) fn estimate_parsed_length(&self) -> usize {
        self.parsers
            .iter()
            .flatten()
            .map(FormatElement::estimate_parsed_length)
            .max()
            .unwrap_or(0)
    }

    /// Each parser starts from the bucket state on entry. The winner's state
    /// is restored afterwards; every other attempt is rolled back.
    ///
    /// A parser that reaches the end of the text, or that has no non-empty
    /// parser after it, wins immediately.
    pub(crate) fn parse(&self, bucket: &mut ParserBucket, text: &str, position: usize) -> ParseOutcome {
        let original = bucket.save_state();
        let mut optional = false;
        let mut best_valid = position;
        let mut best_valid_state = None;
        let mut best_invalid = position;

        for (i, parser) in self.parsers.iter().enumerate() {
            let Some(parser) = parser else {
                if best_valid <= position {
                    return Ok(position);
                }
                optional = true;
                break;
            };
            match parser.parse(bucket, text, position) {
                Ok(end) if end > best_valid => {
                    let last = matches!(self.parsers.get(i + 1), None | Some(None));
                    if end >= text.len() || last {
                        return Ok(end);
                    }
                    best_valid = end;
                    best_valid_state = Some(bucket.save_state());
                }
                Ok(_) => {}
                Err(at) => best_invalid = best_invalid.max(at),
            }
            bucket.restore_state(&original);
        }

        if best_valid > position || (best_valid == position && optional) {
            if let Some(state) = &best_valid_state {
                bucket.restore_state(state);
            }
            return Ok(best_valid);
        }
        Err(best_invalid)
    }
}
