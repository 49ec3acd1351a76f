//! Error types for chesstime

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error("request unsuccessful ({status}) to: {url}")]
    RemoteRequest {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The server could not be reached at all.
    #[error("failed to reach server: {host}")]
    RemoteUnreachable {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body is not the expected JSON shape.
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An archive locator whose trailing segments are not `YYYY/MM`.
    #[error("malformed archive reference: {url}")]
    MalformedArchive { url: String },

    /// A username that cannot be placed in a URL path segment as-is.
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("invalid month: {0}")]
    InvalidMonth(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
