use thiserror::Error;

/// Errors raised while fetching or parsing a feed.  All of them are
/// recoverable from the service's point of view: the previous data stays in
/// force and the fetch is retried later.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported feed location {0:?}")]
    Unsupported(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
