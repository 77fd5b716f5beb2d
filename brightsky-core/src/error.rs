use thiserror::Error;

/// Errors a provider can surface to the aggregation layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered, but not with the structure it documents:
    /// a missing `weather` envelope, a record without a usable
    /// timestamp, or a non-success HTTP status.
    #[error("unexpected provider response: {0}")]
    Server(String),

    /// Transport-level failure, passed through uninterpreted.
    #[error("request to weather provider failed")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
