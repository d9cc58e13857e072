use super::ParseOutcome;

/// Fixed text. Parsing ignores case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    text: String,
}

impl Literal {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn estimate_length(&self) -> usize {
        self.text.chars().count()
    }

    pub(crate) fn print(&self, out: &mut String) {
        out.push_str(&self.text);
    }

    pub(crate) fn parse(&self, text: &str, position: usize) -> ParseOutcome {
        match_ignoring_case(&self.text, text, position)
    }
}

/// Matches `expected` at `position` of `text`, ignoring case.
pub(crate) fn match_ignoring_case(expected: &str, text: &str, position: usize) -> ParseOutcome {
    let mut rest = text.get(position..).ok_or(position)?.chars();
    let mut consumed = 0;
    for expected in expected.chars() {
        match rest.next() {
            Some(actual) if chars_match(actual, expected) => consumed += actual.len_utf8(),
            _ => return Err(position),
        }
    }
    Ok(position + consumed)
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_uppercase().eq(b.to_uppercase()) || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        let literal = Literal::new("T");
        assert_eq!(literal.parse("2020t10", 4), Ok(5));
        assert_eq!(literal.parse("2020x10", 4), Err(4));
        assert_eq!(literal.parse("2020", 4), Err(4), "end of text");
    }
}
