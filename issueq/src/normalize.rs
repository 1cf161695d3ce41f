//! Username normalization for `assignee:` directives
//!
//! The parser only depends on the [`UsernameNormalizer`] trait. The default
//! [`CaseMappedUsername`] maps fullwidth/halfwidth forms, lower-cases and
//! NFC-normalizes the value, then rejects characters that cannot appear in
//! a username.

use thiserror::Error;
use unicode_normalization::char::{decompose_compatible, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("username is empty")]
    Empty,

    #[error("username contains disallowed character {0:?}")]
    Disallowed(char),
}

/// Turns a raw assignee value into a canonical username.
pub trait UsernameNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError>;
}

impl<F> UsernameNormalizer for F
where
    F: Fn(&str) -> Result<String, NormalizeError>,
{
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        self(raw)
    }
}

/// Case-mapped username profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseMappedUsername;

impl UsernameNormalizer for CaseMappedUsername {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut mapped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                // Ideographic space plus the Halfwidth and Fullwidth Forms block.
                '\u{3000}' | '\u{FF01}'..='\u{FFEE}' => decompose_compatible(c, |d| mapped.push(d)),
                _ => mapped.push(c),
            }
        }

        let normalized: String = mapped.to_lowercase().nfc().collect();
        if normalized.is_empty() {
            return Err(NormalizeError::Empty);
        }
        if let Some(bad) = normalized.chars().find(|&c| !is_allowed(c)) {
            return Err(NormalizeError::Disallowed(bad));
        }
        Ok(normalized)
    }
}

fn is_allowed(c: char) -> bool {
    if c.is_whitespace() || c.is_control() {
        return false;
    }
    c.is_ascii() || c.is_alphanumeric() || is_combining_mark(c)
}

/// Passes values through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl UsernameNormalizer for IdentityNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        Ok(raw.to_string())
    }
}
