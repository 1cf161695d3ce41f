pub mod config;
pub mod error;
pub mod normalize;
pub mod query;

pub use config::Config;
pub use error::{Error, Result};
pub use normalize::{CaseMappedUsername, IdentityNormalizer, NormalizeError, UsernameNormalizer};
pub use query::{parse, parse_bytes, parse_str, IssueStatus, ParsedQuery, Parser};
