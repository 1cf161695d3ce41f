//! Issue search query parsing
//!
//! A query is a whitespace separated list of tokens. `status:`, `label:`,
//! `limit:` and `assignee:` tokens set filter fields, any other token with a
//! `:` is dropped, and everything else becomes a term of a tsquery-compatible
//! conjunction (`-term` negates). The characters `! | & ( )` only separate
//! tokens, so boolean syntax in the input is ignored.
//!
//! # Example
//!
//! ```rust
//! use issueq::{parse_str, IssueStatus};
//!
//! let query = parse_str("-a t-est- of -time status:open");
//! assert_eq!(query.search_expression, "!a&t-est-&of&!time");
//! assert_eq!(query.status, IssueStatus::Open);
//! assert_eq!(query.limit, 15);
//! ```

pub mod directive;
pub mod expression;
pub mod scanner;

pub use directive::{Classified, Directive, Update};
pub use expression::{ExpressionBuilder, SearchTerm, NEGATION_MARKER, TERM_SEPARATOR};
pub use scanner::{is_skippable, scan_token, tokens, Scan, TokenScanner};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::normalize::{CaseMappedUsername, UsernameNormalizer};

/// Limit used when none (or zero) was given.
pub const DEFAULT_LIMIT: usize = 15;
pub const MIN_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Issue state filter. `Any` matches both open and closed issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Any,
    Closed,
    Open,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown issue status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for IssueStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(IssueStatus::Open),
            "closed" => Ok(IssueStatus::Closed),
            "any" => Ok(IssueStatus::Any),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueStatus::Any => "any",
            IssueStatus::Closed => "closed",
            IssueStatus::Open => "open",
        })
    }
}

/// Structured form of a query string.
///
/// `search_expression` is meant for a PostgreSQL `to_tsquery` style backend.
/// Terms are copied verbatim from the input, so it must always be passed as a
/// bound parameter and never spliced into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub status: IssueStatus,
    pub search_expression: String,
    pub assignee: String,
    pub limit: usize,
    pub labels: Vec<String>,
}

impl Default for ParsedQuery {
    fn default() -> Self {
        Self {
            status: IssueStatus::Any,
            search_expression: String::new(),
            assignee: String::new(),
            limit: DEFAULT_LIMIT,
            labels: Vec::new(),
        }
    }
}

/// Map the last parsed `limit:` value into the result range.
///
/// Zero means unset, so an explicit `limit:0` also yields the default.
pub fn finalize_limit(raw: i64) -> usize {
    match raw {
        0 => DEFAULT_LIMIT,
        r if r < MIN_LIMIT as i64 => MIN_LIMIT,
        r if r > MAX_LIMIT as i64 => MAX_LIMIT,
        r => r as usize,
    }
}

/// Query parser with an injectable username normalizer.
#[derive(Debug, Clone)]
pub struct Parser<N = CaseMappedUsername> {
    normalizer: N,
    config: ParserConfig,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(CaseMappedUsername)
    }
}

impl<N: UsernameNormalizer> Parser<N> {
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            config: ParserConfig::default(),
        }
    }

    /// Use `config` for buffer sizing of [`Parser::parse`].
    pub fn with_config(mut self, config: &ParserConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Parse a query read incrementally from `reader`.
    ///
    /// Any read error aborts the parse and is returned unchanged.
    pub fn parse<R: Read>(&self, reader: R) -> Result<ParsedQuery> {
        let mut scanner = TokenScanner::with_capacity(
            reader,
            self.config.read_buffer_size,
            self.config.max_token_size,
        );
        let mut assembler = Assembler::new(&self.normalizer);
        while let Some(token) = scanner.next_token()? {
            assembler.consume(&String::from_utf8_lossy(&token));
        }
        Ok(assembler.finish())
    }

    /// Parse an in-memory byte buffer. Invalid UTF-8 inside a token is
    /// replaced with U+FFFD.
    pub fn parse_bytes(&self, input: &[u8]) -> ParsedQuery {
        let mut assembler = Assembler::new(&self.normalizer);
        for token in tokens(input) {
            assembler.consume(&String::from_utf8_lossy(token));
        }
        assembler.finish()
    }

    pub fn parse_str(&self, input: &str) -> ParsedQuery {
        self.parse_bytes(input.as_bytes())
    }
}

/// Folds tokens into a [`ParsedQuery`].
struct Assembler<'n, N: ?Sized> {
    normalizer: &'n N,
    status: IssueStatus,
    assignee: String,
    raw_limit: i64,
    labels: Vec<String>,
    expression: ExpressionBuilder,
}

impl<'n, N: UsernameNormalizer + ?Sized> Assembler<'n, N> {
    fn new(normalizer: &'n N) -> Self {
        Self {
            normalizer,
            status: IssueStatus::Any,
            assignee: String::new(),
            raw_limit: 0,
            labels: Vec::new(),
            expression: ExpressionBuilder::new(),
        }
    }

    fn consume(&mut self, token: &str) {
        match directive::classify(token) {
            Classified::Directive(d) => self.apply(d),
            Classified::Text(text) => match SearchTerm::from_token(text) {
                Some(term) => {
                    tracing::trace!(term = term.text, negated = term.negated, "search term");
                    self.expression.push(term);
                }
                None => tracing::trace!("Discarding bare negation"),
            },
        }
    }

    fn apply(&mut self, d: Directive<'_>) {
        let changed = match d {
            Directive::Status(value) => directive::status_update(value).apply(&mut self.status),
            Directive::Limit(value) => directive::limit_update(value).apply(&mut self.raw_limit),
            Directive::Assignee(value) => {
                directive::assignee_update(self.normalizer, value).apply(&mut self.assignee)
            }
            Directive::Label(value) => match directive::label_update(value) {
                Update::Set(label) => {
                    self.labels.push(label);
                    true
                }
                Update::Keep => false,
            },
            Directive::Unknown(prefix) => {
                tracing::debug!("Discarding unknown directive {:?}", prefix);
                return;
            }
        };
        if !changed {
            tracing::debug!("Ignoring malformed directive value: {:?}", d);
        }
    }

    fn finish(self) -> ParsedQuery {
        let parsed = ParsedQuery {
            status: self.status,
            search_expression: self.expression.finish(),
            assignee: self.assignee,
            limit: finalize_limit(self.raw_limit),
            labels: self.labels,
        };
        tracing::debug!(
            status = %parsed.status,
            limit = parsed.limit,
            labels = parsed.labels.len(),
            "Parsed query"
        );
        parsed
    }
}

/// Parse a query from a reader with the default parser.
pub fn parse<R: Read>(reader: R) -> Result<ParsedQuery> {
    Parser::default().parse(reader)
}

/// Parse a query string with the default parser.
pub fn parse_str(input: &str) -> ParsedQuery {
    Parser::default().parse_str(input)
}

/// Parse a query byte buffer with the default parser.
pub fn parse_bytes(input: &[u8]) -> ParsedQuery {
    Parser::default().parse_bytes(input)
}
