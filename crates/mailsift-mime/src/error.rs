//! Error types for message parsing and body extraction.

/// Result type alias for message-level operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Result type alias for body and body-part extraction.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Errors that abort parsing of a whole message.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The header block could not be delimited or contains a line that is not a header.
    #[error("Malformed header block: {0}")]
    MalformedHeaderBlock(String),

    /// The top-level `Content-Type` could not be tokenized.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// The top-level body yielded no text.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors raised while resolving the plain text of a body or body part.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A multipart content type without a `boundary` parameter.
    #[error("Missing boundary in multipart content type")]
    MissingBoundary,

    /// Base64 or quoted-printable content that does not decode.
    #[error("Failed to decode {encoding} content: {reason}")]
    TransferDecodeFailed {
        /// Transfer encoding that was being undone.
        encoding: String,
        /// What went wrong.
        reason: String,
    },

    /// A charset outside the supported table.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// A media type that carries no extractable text.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Multipart nesting exceeded the configured limit.
    #[error("Multipart nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// The configured maximum depth.
        limit: usize,
    },

    /// A sub-part declared a `Content-Type` that cannot be tokenized.
    #[error("Invalid content type in body part: {0}")]
    InvalidContentType(String),

    /// A sub-part whose header block cannot be delimited.
    #[error("Malformed body part: {0}")]
    MalformedPart(String),
}

impl ExtractError {
    pub(crate) fn transfer(encoding: &str, reason: impl ToString) -> Self {
        Self::TransferDecodeFailed {
            encoding: encoding.to_string(),
            reason: reason.to_string(),
        }
    }
}
