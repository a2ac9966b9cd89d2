use thiserror::Error;

/// Failures surfaced by the fetch layer.
///
/// Cache read problems never appear here; the cache absorbs them as misses.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with an error payload, a non-2xx status, or a
    /// response the client could not decode.
    #[error("endpoint error: {0}")]
    Endpoint(String),
}
