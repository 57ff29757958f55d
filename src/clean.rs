use once_cell::sync::Lazy;
use regex::Regex;

use crate::CaptionSegment;

// Inline styling/karaoke tags (<c>, </c>, <00:00:01.000>, <b>, ...).
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
// Bracketed time ranges some auto-caption tools leave in cue text.
static TIME_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\.\d+s\s*-\s*\d+\.\d+s\]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw cue text: strip markup, decode HTML entities, collapse all
/// whitespace runs to single spaces and trim. Pure; returns an empty string
/// for input that was nothing but markup or whitespace, and the caller is
/// responsible for dropping the resulting empty segments.
pub fn normalize(raw: &str) -> String {
    let text = MARKUP_TAG.replace_all(raw, "");
    let text = TIME_RANGE.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Output of the deduplication pass: the surviving segments in original
/// order, plus the clean-text accumulation of incremental new content only.
#[derive(Debug, Clone)]
pub struct Deduped {
    pub segments: Vec<CaptionSegment>,
    pub clean_text: String,
}

/// Single forward pass over normalized segments, removing the rolling
/// repetition that auto-generated caption streams produce.
///
/// A segment whose text exactly repeats the previous one is dropped. A
/// segment whose text extends the previous one (previous text is a proper
/// prefix) is kept in full for the detailed output, but only its new suffix
/// enters the clean text. Comparison is exact; no fuzzy matching.
pub fn dedupe(segments: Vec<CaptionSegment>) -> Deduped {
    let mut out = Vec::with_capacity(segments.len());
    let mut clean_text = String::new();
    let mut last_text = String::new();

    for segment in segments {
        if segment.text == last_text {
            continue;
        }

        let fresh = if !last_text.is_empty() && segment.text.starts_with(last_text.as_str()) {
            segment.text[last_text.len()..].trim()
        } else {
            segment.text.as_str()
        };

        if !fresh.is_empty() {
            if !clean_text.is_empty() {
                clean_text.push(' ');
            }
            clean_text.push_str(fresh);
        }

        last_text.clone_from(&segment.text);
        out.push(segment);
    }

    Deduped {
        segments: out,
        clean_text,
    }
}
