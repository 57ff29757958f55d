pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod parse;
pub mod youtube;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One timed caption unit. Text is raw as parsed until it passes through
/// [`clean::normalize`]; after that it is never mutated again.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// The caption wire formats the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Vtt,
    #[serde(rename = "srv3", alias = "srv1")]
    Srv,
    Json3,
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatKind::Vtt => write!(f, "vtt"),
            FormatKind::Srv => write!(f, "srv3"),
            FormatKind::Json3 => write!(f, "json3"),
        }
    }
}

/// One selectable caption source for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub format: FormatKind,
    pub url: String,
}

/// Video metadata as reported by the platform. An empty `tracks` list is a
/// valid state (the video simply has no captions), not an error.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub duration_seconds: f64,
    pub tracks: Vec<CaptionTrack>,
}

/// Result of a clean-text extraction.
#[derive(Debug, Clone)]
pub struct CleanExtraction {
    pub video_id: String,
    pub video_title: String,
    pub caption_format: FormatKind,
    pub clean_text: String,
    pub content_length: usize,
}

/// Result of a detailed extraction, keeping per-segment timing.
#[derive(Debug, Clone)]
pub struct DetailedExtraction {
    pub video_id: String,
    pub video_title: String,
    pub video_duration: f64,
    pub total_captions: usize,
    pub format: FormatKind,
    pub captions: Vec<CaptionSegment>,
}

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

static URL_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:youtube\.com/watch\?.*v=)([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Resolve a video URL (or bare ID) to a canonical 11-character video ID.
pub fn resolve_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    URL_SHAPES
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(resolve_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(resolve_video_id("not-a-valid-id"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(resolve_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_segment_duration() {
        let seg = CaptionSegment {
            start: 1.5,
            end: 4.0,
            text: "hi".to_string(),
        };
        assert!((seg.duration() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_kind_wire_names() {
        assert_eq!(FormatKind::Vtt.to_string(), "vtt");
        assert_eq!(FormatKind::Srv.to_string(), "srv3");
        assert_eq!(FormatKind::Json3.to_string(), "json3");
    }

    #[test]
    fn test_format_kind_deserialize_aliases() {
        let vtt: FormatKind = serde_json::from_str("\"vtt\"").unwrap();
        let srv3: FormatKind = serde_json::from_str("\"srv3\"").unwrap();
        let srv1: FormatKind = serde_json::from_str("\"srv1\"").unwrap();
        let json3: FormatKind = serde_json::from_str("\"json3\"").unwrap();
        assert_eq!(vtt, FormatKind::Vtt);
        assert_eq!(srv3, FormatKind::Srv);
        assert_eq!(srv1, FormatKind::Srv);
        assert_eq!(json3, FormatKind::Json3);
    }
}
