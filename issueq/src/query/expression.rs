//! tsquery-style search expression assembly

/// Placed between two accepted terms.
pub const TERM_SEPARATOR: char = '&';
/// Prefixed directly to a negated term.
pub const NEGATION_MARKER: char = '!';

/// A free-text term, with one leading `-` stripped into `negated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTerm<'a> {
    pub text: &'a str,
    pub negated: bool,
}

impl<'a> SearchTerm<'a> {
    /// `None` when nothing is left after stripping the negation (`-`).
    pub fn from_token(token: &'a str) -> Option<Self> {
        let (text, negated) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if text.is_empty() {
            return None;
        }
        Some(SearchTerm { text, negated })
    }
}

/// Builds the conjunction `a&!b&c`.
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    buf: String,
    terms: usize,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, term: SearchTerm<'_>) {
        if self.terms > 0 {
            self.buf.push(TERM_SEPARATOR);
        }
        if term.negated {
            self.buf.push(NEGATION_MARKER);
        }
        self.buf.push_str(term.text);
        self.terms += 1;
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(
            SearchTerm::from_token("foo"),
            Some(SearchTerm {
                text: "foo",
                negated: false
            })
        );
        assert_eq!(
            SearchTerm::from_token("-foo"),
            Some(SearchTerm {
                text: "foo",
                negated: true
            })
        );
        assert_eq!(SearchTerm::from_token("-"), None);
    }

    #[test]
    fn test_only_one_dash_stripped() {
        assert_eq!(
            SearchTerm::from_token("--foo"),
            Some(SearchTerm {
                text: "-foo",
                negated: true
            })
        );
    }

    #[test]
    fn test_empty_builder_yields_empty_expression() {
        let mut builder = ExpressionBuilder::new();
        for token in ["-", "-"] {
            if let Some(term) = SearchTerm::from_token(token) {
                builder.push(term);
            }
        }
        assert_eq!(builder.finish(), "");
    }

    #[test]
    fn test_builder_joins_terms() {
        let mut builder = ExpressionBuilder::new();
        for token in ["-a", "t-est-", "-", "of", "-time"] {
            if let Some(term) = SearchTerm::from_token(token) {
                builder.push(term);
            }
        }
        assert_eq!(builder.finish(), "!a&t-est-&of&!time");
    }
}
