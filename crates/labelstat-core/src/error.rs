//! Shared error type across labelstat crates.

use thiserror::Error;

/// Stable error categories (used in logs, metric labels and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Host failed to return announced body bytes.
    BodyRead,
    /// Body is not JSON or does not have the predictions shape.
    Parse,
    /// Body outgrew the buffer limit before it ended.
    BodyTooLarge,
    /// Host could not define a counter.
    MetricCreation,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Upstream request failed.
    Upstream,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BodyRead => "BODY_READ",
            ErrorKind::Parse => "PARSE",
            ErrorKind::BodyTooLarge => "BODY_TOO_LARGE",
            ErrorKind::MetricCreation => "METRIC_CREATION",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Upstream => "UPSTREAM",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Every way a response body can fail to yield a prediction set.
///
/// One variant per extraction step, in traversal order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("missing predictions key from response")]
    MissingPredictions,
    #[error("predictions is not an array")]
    PredictionsNotArray,
    #[error("predictions has no first element")]
    MissingFirstSet,
    #[error("predictions[0] is not an array")]
    FirstSetNotArray,
    #[error("predictions[0][{index}]: {reason}")]
    InvalidPrediction { index: usize, reason: &'static str },
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LabelStatError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum LabelStatError {
    #[error("failed to get response body: {0}")]
    BodyRead(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("response body exceeds {0} bytes")]
    BodyTooLarge(usize),
    #[error("failed to define counter: {0}")]
    MetricCreation(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl LabelStatError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelStatError::BodyRead(_) => ErrorKind::BodyRead,
            LabelStatError::Parse(_) => ErrorKind::Parse,
            LabelStatError::BodyTooLarge(_) => ErrorKind::BodyTooLarge,
            LabelStatError::MetricCreation(_) => ErrorKind::MetricCreation,
            LabelStatError::BadConfig(_) => ErrorKind::BadConfig,
            LabelStatError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            LabelStatError::Upstream(_) => ErrorKind::Upstream,
            LabelStatError::Internal(_) => ErrorKind::Internal,
        }
    }
}
