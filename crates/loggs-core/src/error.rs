use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Unknown view: {0}")]
    UnknownView(String),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidConfiguration`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
