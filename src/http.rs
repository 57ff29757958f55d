use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::extract::Extractor;
use crate::youtube::InnerTubeClient;
use crate::{CaptionSegment, CleanExtraction, DetailedExtraction, FormatKind};

pub struct AppState {
    pub extractor: Extractor<InnerTubeClient>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/captions/extract", post(extract))
        .route("/api/v1/captions/extract/detailed", post(extract_detailed))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    pub youtube_url: String,
    /// Optional caption wire-format preference.
    #[serde(default)]
    pub format: Option<FormatKind>,
}

#[derive(Debug, Serialize)]
struct CleanBody {
    success: bool,
    video_title: String,
    video_id: String,
    caption_format: FormatKind,
    clean_text: String,
    content_length: usize,
}

impl From<CleanExtraction> for CleanBody {
    fn from(r: CleanExtraction) -> Self {
        Self {
            success: true,
            video_title: r.video_title,
            video_id: r.video_id,
            caption_format: r.caption_format,
            clean_text: r.clean_text,
            content_length: r.content_length,
        }
    }
}

#[derive(Debug, Serialize)]
struct SegmentBody {
    start_time: f64,
    end_time: f64,
    duration: f64,
    text: String,
}

impl From<CaptionSegment> for SegmentBody {
    fn from(s: CaptionSegment) -> Self {
        Self {
            start_time: s.start,
            end_time: s.end,
            duration: s.duration(),
            text: s.text,
        }
    }
}

#[derive(Debug, Serialize)]
struct DetailedBody {
    success: bool,
    video_title: String,
    video_id: String,
    video_duration: f64,
    total_captions: usize,
    format: FormatKind,
    captions: Vec<SegmentBody>,
}

impl From<DetailedExtraction> for DetailedBody {
    fn from(r: DetailedExtraction) -> Self {
        Self {
            success: true,
            video_title: r.video_title,
            video_id: r.video_id,
            video_duration: r.video_duration,
            total_captions: r.total_captions,
            format: r.format,
            captions: r.captions.into_iter().map(SegmentBody::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    details: String,
}

fn error_status(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::InvalidUrl(_)
        | ExtractError::VideoUnavailable(_)
        | ExtractError::VideoTooLong { .. }
        | ExtractError::NoCaptionsAvailable(_) => StatusCode::BAD_REQUEST,
        // Upstream faults, not bad input.
        ExtractError::CaptionFetchFailed(_) | ExtractError::UnrecognizedFormat { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        warn!("Extraction failed: {self}");
        let body = ErrorBody {
            success: false,
            error: self.summary().to_string(),
            details: self.to_string(),
        };
        (error_status(&self), Json(body)).into_response()
    }
}

async fn extract(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptionRequest>,
) -> Result<Json<CleanBody>, ExtractError> {
    info!("Caption extraction request: {}", req.youtube_url);
    let result = state.extractor.extract(&req.youtube_url, req.format).await?;
    Ok(Json(result.into()))
}

async fn extract_detailed(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptionRequest>,
) -> Result<Json<DetailedBody>, ExtractError> {
    info!("Detailed caption extraction request: {}", req.youtube_url);
    let result = state
        .extractor
        .extract_detailed(&req.youtube_url, req.format)
        .await?;
    Ok(Json(result.into()))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "ytcaps",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "health_url": "/health",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let errors = [
            ExtractError::InvalidUrl("x".to_string()),
            ExtractError::VideoUnavailable("private".to_string()),
            ExtractError::VideoTooLong { actual: 9000.0, max: 7200 },
            ExtractError::NoCaptionsAvailable("none".to_string()),
        ];
        for err in errors {
            assert_eq!(error_status(&err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_upstream_errors_map_to_502() {
        assert_eq!(
            error_status(&ExtractError::CaptionFetchFailed("timeout".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&ExtractError::UnrecognizedFormat {
                format: FormatKind::Vtt,
                detail: "nope".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ExtractError::NoCaptionsAvailable("no en track".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_deserialization() {
        let req: CaptionRequest = serde_json::from_str(
            r#"{"youtube_url": "https://youtu.be/dQw4w9WgXcQ", "format": "json3"}"#,
        )
        .unwrap();
        assert_eq!(req.format, Some(FormatKind::Json3));

        let req: CaptionRequest =
            serde_json::from_str(r#"{"youtube_url": "dQw4w9WgXcQ"}"#).unwrap();
        assert!(req.format.is_none());

        let bad = serde_json::from_str::<CaptionRequest>(
            r#"{"youtube_url": "x", "format": "srt"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_clean_body_serialization() {
        let body = CleanBody::from(CleanExtraction {
            video_id: "dQw4w9WgXcQ".to_string(),
            video_title: "Test".to_string(),
            caption_format: FormatKind::Vtt,
            clean_text: "hello world".to_string(),
            content_length: 11,
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["caption_format"], "vtt");
        assert_eq!(value["content_length"], 11);
    }

    #[test]
    fn test_detailed_body_serialization() {
        let body = DetailedBody::from(DetailedExtraction {
            video_id: "dQw4w9WgXcQ".to_string(),
            video_title: "Test".to_string(),
            video_duration: 120.0,
            total_captions: 1,
            format: FormatKind::Json3,
            captions: vec![CaptionSegment {
                start: 1.0,
                end: 3.5,
                text: "hi".to_string(),
            }],
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["format"], "json3");
        assert_eq!(value["captions"][0]["start_time"], 1.0);
        assert_eq!(value["captions"][0]["end_time"], 3.5);
        assert_eq!(value["captions"][0]["duration"], 2.5);
    }
}
