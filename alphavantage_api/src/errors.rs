//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (network error, timeout, bad URL).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API answered 200 but rejected the query, or the payload had an
    /// unexpected shape.
    #[error("Query failed: {0}")]
    Query(String),
    /// The API answered 200 with a call-quota or demo-key notice.
    #[error("API call limit reached: {0}")]
    QueryLimit(String),
}
