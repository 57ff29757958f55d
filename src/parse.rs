use log::debug;
use serde::Deserialize;

use crate::error::{ExtractError, Result};
use crate::{CaptionSegment, FormatKind};

/// Parse a raw caption payload in the given wire format into timed segments.
///
/// Zero segments from a structurally valid payload is a normal outcome; the
/// only error a parser reports is a payload that does not look like its
/// declared format at all.
pub fn parse(kind: FormatKind, payload: &str) -> Result<Vec<CaptionSegment>> {
    match kind {
        FormatKind::Vtt => parse_vtt(payload),
        FormatKind::Srv => parse_srv(payload),
        FormatKind::Json3 => parse_json3(payload),
    }
}

fn parse_vtt(payload: &str) -> Result<Vec<CaptionSegment>> {
    if !payload.contains("WEBVTT") && !payload.contains("-->") {
        return Err(ExtractError::UnrecognizedFormat {
            format: FormatKind::Vtt,
            detail: "missing WEBVTT header and cue timings".to_string(),
        });
    }

    let mut segments = Vec::new();
    let mut lines = payload.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((start_raw, end_raw)) = line.split_once("-->") else {
            continue;
        };

        let start = vtt_timestamp(start_raw.trim());
        // The end stamp may be followed by positioning directives; take the
        // first token only.
        let end = end_raw
            .split_whitespace()
            .next()
            .and_then(vtt_timestamp);

        // A cue with an unparseable timing line is skipped; its text lines
        // fall through the outer loop as non-timing lines.
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        if end < start {
            continue;
        }

        let mut text_lines = Vec::new();
        while let Some(next) = lines.peek() {
            let next = next.trim();
            if next.is_empty() || next.contains("-->") {
                break;
            }
            text_lines.push(next);
            lines.next();
        }

        // Inline styling tags stay verbatim here; stripping is the
        // normalizer's job.
        let text = text_lines.join(" ");
        if !text.is_empty() {
            segments.push(CaptionSegment { start, end, text });
        }
    }

    debug!("parsed {} VTT cues", segments.len());
    Ok(segments)
}

/// Convert a `HH:MM:SS.mmm` / `MM:SS.mmm` / `SS.mmm` stamp to seconds.
/// A comma decimal separator is accepted alongside the dot.
fn vtt_timestamp(stamp: &str) -> Option<f64> {
    let stamp = stamp.replace(',', ".");
    let parts: Vec<&str> = stamp.split(':').collect();

    let seconds = match parts.as_slice() {
        [h, m, s] => h.parse::<f64>().ok()? * 3600.0 + m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?,
        [m, s] => m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?,
        [s] => s.parse::<f64>().ok()?,
        _ => return None,
    };

    (seconds >= 0.0).then_some(seconds)
}

fn parse_srv(payload: &str) -> Result<Vec<CaptionSegment>> {
    use quick_xml::Reader;
    use quick_xml::events::{BytesStart, Event};

    if !payload.trim_start().starts_with('<') {
        return Err(ExtractError::UnrecognizedFormat {
            format: FormatKind::Srv,
            detail: "payload is not an XML document".to_string(),
        });
    }

    // <text start="s" dur="s"> carries float seconds (srv1-style),
    // <p t="ms" d="ms"> carries integer milliseconds (srv3-style).
    fn timing_seconds(e: &BytesStart) -> Option<(f64, f64)> {
        let mut start = None;
        let mut dur = 0.0;
        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.as_ref() {
                b"start" => start = value.parse::<f64>().ok(),
                b"dur" => dur = value.parse::<f64>().unwrap_or(0.0),
                _ => {}
            }
        }
        start.map(|s| (s, s + dur))
    }

    fn timing_millis(e: &BytesStart) -> Option<(f64, f64)> {
        let mut start = None;
        let mut dur = 0.0;
        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.as_ref() {
                b"t" => start = value.parse::<f64>().ok().map(|ms| ms / 1000.0),
                b"d" => dur = value.parse::<f64>().map(|ms| ms / 1000.0).unwrap_or(0.0),
                _ => {}
            }
        }
        start.map(|s| (s, s + dur))
    }

    let mut reader = Reader::from_str(payload);
    let mut segments = Vec::new();
    // Current cue: (start, end, accumulated text). Nested elements such as
    // srv3 word-level <s> spans contribute text to the enclosing cue.
    let mut cue: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"text" => cue = timing_seconds(e).map(|(s, en)| (s, en, String::new())),
                b"p" => cue = timing_millis(e).map(|(s, en)| (s, en, String::new())),
                _ => {}
            },
            Ok(Event::Empty(_)) => {
                // Self-closing element with no content; skip.
            }
            Ok(Event::Text(ref e)) => {
                if let Some((_, _, buf)) = cue.as_mut() {
                    buf.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref e)) if matches!(e.name().as_ref(), b"text" | b"p") => {
                if let Some((start, end, text)) = cue.take() {
                    if !text.is_empty() {
                        segments.push(CaptionSegment { start, end, text });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::UnrecognizedFormat {
                    format: FormatKind::Srv,
                    detail: e.to_string(),
                });
            }
            _ => {}
        }
    }

    debug!("parsed {} timed-text cues", segments.len());
    Ok(segments)
}

#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: f64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: f64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

fn parse_json3(payload: &str) -> Result<Vec<CaptionSegment>> {
    let parsed: Json3Payload =
        serde_json::from_str(payload).map_err(|e| ExtractError::UnrecognizedFormat {
            format: FormatKind::Json3,
            detail: e.to_string(),
        })?;

    let segments: Vec<CaptionSegment> = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            if text.is_empty() {
                return None;
            }
            let start = event.start_ms / 1000.0;
            Some(CaptionSegment {
                start,
                end: start + event.duration_ms / 1000.0,
                text,
            })
        })
        .collect();

    debug!("parsed {} JSON3 events", segments.len());
    Ok(segments)
}
