use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Read failure from a streaming source; displays the source error unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Token too long: exceeds {limit} bytes")]
    TokenTooLong { limit: usize },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
