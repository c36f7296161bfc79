//! Error types for the homework bot

/// Errors that can occur while polling the review API and relaying notifications
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// One or more required credentials are empty. Names the missing ones.
    #[error("Missing required credentials: {}", .0.join(", "))]
    InvalidToken(Vec<&'static str>),

    #[error("Could not connect to the review API, check the network connection: {0}")]
    ApiConnection(String),

    #[error("Review API request failed: {0}")]
    GetApiAnswer(String),

    #[error("Review API returned status code {0}")]
    WrongStatusCode(u16),

    #[error("Review API response is not valid JSON: {0}")]
    ApiJson(String),

    #[error("Review API response is missing key '{0}'")]
    ApiResponseKey(String),

    #[error("Unexpected data type: expected {expected}, got {got}")]
    WrongArrayType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Review API response failed validation: {0}")]
    CheckResponse(String),

    #[error("Undocumented homework status '{0}'")]
    UnknownHomeworkStatus(String),

    #[error("Failed to send message: {0}")]
    MessageSend(String),

    /// Transport could not reach the remote host.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
