//! Token scanner for the query language
//!
//! Splits input on Unicode whitespace and the tsquery operator characters
//! `! | & ( )`. Separators never appear inside a token.
//!
//! [`scan_token`] is the restartable step function. [`tokens`] drives it over
//! a complete in-memory buffer, [`TokenScanner`] over a growing buffer filled
//! from any [`Read`] source.

use std::io::{self, Read};
use std::ops::Range;

use crate::config::DEFAULT_READ_BUFFER_SIZE;
use crate::error::{Error, Result};

/// Whether `c` separates tokens.
pub fn is_skippable(c: char) -> bool {
    c.is_whitespace() || matches!(c, '!' | '|' | '&' | '(' | ')')
}

/// Outcome of one [`scan_token`] step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// A complete token at `span`; `advance` also covers the trailing separator.
    Token { span: Range<usize>, advance: usize },
    /// No complete token in the buffer. `advance` covers leading separators
    /// that were already skipped. At EOF this means the input is exhausted.
    NeedMore { advance: usize },
}

enum Decoded {
    Char(char, usize),
    Invalid(usize),
    Incomplete,
}

fn decode(data: &[u8]) -> Decoded {
    let window = &data[..data.len().min(4)];
    let (valid, error) = match std::str::from_utf8(window) {
        Ok(s) => (s, None),
        Err(e) => (
            std::str::from_utf8(&window[..e.valid_up_to()]).unwrap_or_default(),
            Some(e),
        ),
    };
    if let Some(c) = valid.chars().next() {
        return Decoded::Char(c, c.len_utf8());
    }
    match error.and_then(|e| e.error_len()) {
        Some(len) => Decoded::Invalid(len),
        None => Decoded::Incomplete,
    }
}

/// Find the next token in `data`.
///
/// Invalid UTF-8 is never a separator. A multi-byte sequence cut off at the
/// end of `data` asks for more input unless `at_eof` is set, in which case it
/// becomes part of the final token. Never reads past `data.len()`.
pub fn scan_token(data: &[u8], at_eof: bool) -> Scan {
    let mut start = 0;
    while start < data.len() {
        match decode(&data[start..]) {
            Decoded::Char(c, width) if is_skippable(c) => start += width,
            Decoded::Incomplete if !at_eof => return Scan::NeedMore { advance: start },
            _ => break,
        }
    }

    let mut end = start;
    while end < data.len() {
        match decode(&data[end..]) {
            Decoded::Char(c, width) if is_skippable(c) => {
                return Scan::Token {
                    span: start..end,
                    advance: end + width,
                };
            }
            Decoded::Char(_, width) | Decoded::Invalid(width) => end += width,
            Decoded::Incomplete if at_eof => end = data.len(),
            Decoded::Incomplete => return Scan::NeedMore { advance: start },
        }
    }

    if at_eof && end > start {
        return Scan::Token {
            span: start..end,
            advance: data.len(),
        };
    }
    Scan::NeedMore { advance: start }
}

/// Iterator over the tokens of a complete in-memory buffer.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

/// Split a complete buffer into tokens.
pub fn tokens(data: &[u8]) -> Tokens<'_> {
    Tokens { rest: data }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        match scan_token(self.rest, true) {
            Scan::Token { span, advance } => {
                let token = &self.rest[span];
                self.rest = &self.rest[advance..];
                Some(token)
            }
            Scan::NeedMore { .. } => {
                self.rest = &[];
                None
            }
        }
    }
}

/// Incremental scanner over a [`Read`] source.
///
/// Only the unconsumed tail of the input is buffered. The buffer doubles when
/// a token does not fit, without bound unless a `max_token_size` is given.
pub struct TokenScanner<R> {
    reader: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    at_eof: bool,
    max_token_size: Option<usize>,
}

impl<R: Read> TokenScanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_READ_BUFFER_SIZE, None)
    }

    pub fn with_capacity(reader: R, buffer_size: usize, max_token_size: Option<usize>) -> Self {
        let buffer_size = buffer_size.max(1);
        Self {
            reader,
            buf: vec![0; buffer_size],
            start: 0,
            end: 0,
            at_eof: false,
            max_token_size: max_token_size.map(|max| max.max(buffer_size)),
        }
    }

    /// Next token, `Ok(None)` once the source is exhausted.
    ///
    /// A read error ends the scan; later calls return `Ok(None)`.
    pub fn next_token(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if self.end > self.start || self.at_eof {
                match scan_token(&self.buf[self.start..self.end], self.at_eof) {
                    Scan::Token { span, advance } => {
                        let token = self.buf[self.start + span.start..self.start + span.end].to_vec();
                        self.start += advance;
                        return Ok(Some(token));
                    }
                    Scan::NeedMore { advance } => self.start += advance,
                }
            }
            if self.at_eof {
                return Ok(None);
            }
            if let Err(err) = self.fill() {
                self.at_eof = true;
                self.start = self.end;
                return Err(err);
            }
        }
    }

    fn fill(&mut self) -> Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end == self.buf.len() {
            let mut grown = self.buf.len() * 2;
            if let Some(limit) = self.max_token_size {
                if self.buf.len() >= limit {
                    return Err(Error::TokenTooLong { limit });
                }
                grown = grown.min(limit);
            }
            self.buf.resize(grown, 0);
        }
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.at_eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for TokenScanner<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
