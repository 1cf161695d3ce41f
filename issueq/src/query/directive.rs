//! `prefix:value` directives
//!
//! Every value handler returns an [`Update`]. Malformed values produce
//! [`Update::Keep`] so the field retains whatever it held before.

use super::IssueStatus;
use crate::normalize::UsernameNormalizer;

pub const PREFIX_STATUS: &str = "status:";
pub const PREFIX_LABEL: &str = "label:";
pub const PREFIX_LIMIT: &str = "limit:";
pub const PREFIX_ASSIGNEE: &str = "assignee:";

/// Result of applying one directive value to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update<T> {
    Set(T),
    Keep,
}

impl<T> Update<T> {
    /// Overwrite `slot` on `Set`. Returns whether anything changed.
    pub fn apply(self, slot: &mut T) -> bool {
        match self {
            Update::Set(value) => {
                *slot = value;
                true
            }
            Update::Keep => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Status(&'a str),
    Label(&'a str),
    Limit(&'a str),
    Assignee(&'a str),
    /// Contains `:` but the prefix is not recognized. Carries the prefix.
    Unknown(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    Directive(Directive<'a>),
    Text(&'a str),
}

/// Route a token by the text up to and including its first `:`.
pub fn classify(token: &str) -> Classified<'_> {
    let Some(idx) = token.find(':') else {
        return Classified::Text(token);
    };
    let (prefix, value) = token.split_at(idx + 1);
    let directive = match prefix {
        PREFIX_STATUS => Directive::Status(value),
        PREFIX_LABEL => Directive::Label(value),
        PREFIX_LIMIT => Directive::Limit(value),
        PREFIX_ASSIGNEE => Directive::Assignee(value),
        _ => Directive::Unknown(prefix),
    };
    Classified::Directive(directive)
}

pub fn status_update(value: &str) -> Update<IssueStatus> {
    match value.parse() {
        Ok(status) => Update::Set(status),
        Err(_) => Update::Keep,
    }
}

pub fn label_update(value: &str) -> Update<String> {
    if value.is_empty() {
        Update::Keep
    } else {
        Update::Set(value.to_string())
    }
}

/// Raw (unclamped) limit.
pub fn limit_update(value: &str) -> Update<i64> {
    match value.parse() {
        Ok(limit) => Update::Set(limit),
        Err(_) => Update::Keep,
    }
}

/// Always sets the assignee. A failed normalization assigns the empty string.
pub fn assignee_update<N>(normalizer: &N, value: &str) -> Update<String>
where
    N: UsernameNormalizer + ?Sized,
{
    match normalizer.normalize(value) {
        Ok(username) => Update::Set(username),
        Err(err) => {
            tracing::debug!("Ignoring assignee normalization failure for {:?}: {}", value, err);
            Update::Set(String::new())
        }
    }
}
