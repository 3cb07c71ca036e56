/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum PipeDbError {
    /// Invalid connection configuration, rejected at client construction.
    #[error("configuration error: {0}")]
    Config(String),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// SQL/pipeline error reported by the server, message text verbatim from
    /// the first failing step.
    #[error("query error: {message}")]
    Query {
        /// Error message text from the server.
        message: String,
    },
    /// Malformed server response or protocol-shape violation.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Row field lookup outside the result set's column schema.
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },
}
