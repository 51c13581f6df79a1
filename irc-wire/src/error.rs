use thiserror::Error;

/// Errors raised while parsing a line or an ISUPPORT token. A line that fails to parse does not
/// invalidate anything already drained from the framer; only that one line is lost.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("malformed tag block: no space terminates the tags")]
    MalformedTags,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("line exceeds the maximum protocol length ({0} bytes)")]
    LineTooLong(usize),

    #[error("malformed IRC line: {0}")]
    MalformedLine(String),

    #[error("malformed ISUPPORT token: {0}")]
    MalformedIsupport(String),
}
