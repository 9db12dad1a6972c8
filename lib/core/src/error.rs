use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed corpus: {0}")]
    Csv(#[from] csv::Error),

    #[error("Corpus is missing required column: {0}")]
    MissingColumn(String),

    #[error("Corpus contains no usable items")]
    EmptyCorpus,

    #[error("Movie '{0}' not found in the database")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the engine stays usable after this error and the caller may
    /// simply retry with a different query.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Load-time failures that make the corpus unreadable.
    pub fn is_io_class(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Csv(_) | Error::MissingColumn(_))
    }
}
