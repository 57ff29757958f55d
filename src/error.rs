use thiserror::Error;

use crate::FormatKind;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failure kinds for a caption extraction request. Each kind is reported
/// distinctly all the way to the HTTP boundary; none are collapsed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a recognized YouTube URL or video ID: {0}")]
    InvalidUrl(String),

    #[error("video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("video duration {actual:.0}s exceeds the maximum allowed {max}s")]
    VideoTooLong { actual: f64, max: u64 },

    #[error("no captions available: {0}")]
    NoCaptionsAvailable(String),

    #[error("failed to fetch caption payload: {0}")]
    CaptionFetchFailed(String),

    #[error("caption payload not recognizable as {format}: {detail}")]
    UnrecognizedFormat { format: FormatKind, detail: String },
}

impl ExtractError {
    /// Short human summary, used as the `error` field of error responses.
    pub fn summary(&self) -> &'static str {
        match self {
            ExtractError::InvalidUrl(_) => "Invalid YouTube URL",
            ExtractError::VideoUnavailable(_) => "Video unavailable",
            ExtractError::VideoTooLong { .. } => "Video too long",
            ExtractError::NoCaptionsAvailable(_) => "No captions available",
            ExtractError::CaptionFetchFailed(_) => "Failed to download captions",
            ExtractError::UnrecognizedFormat { .. } => "Unrecognized caption format",
        }
    }
}
