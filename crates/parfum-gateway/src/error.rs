use parfum_core::{StorageError, ValidationError};
use thiserror::Error;

/// Errors returned by the storefront backend gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 404, or a mutation matched no row.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx answer.
    #[error("backend returned {status} for {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid backend base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The operation needs a signed-in session.
    #[error("{0} requires a signed-in session")]
    Unauthenticated(&'static str),

    #[error("invalid sale: {0}")]
    InvalidSale(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
