use log::{debug, info};

use crate::clean;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::parse;
use crate::youtube::VideoPlatform;
use crate::{
    CaptionSegment, CaptionTrack, CleanExtraction, DetailedExtraction, FormatKind, VideoMetadata,
    resolve_video_id,
};

/// Pick one caption track. Only tracks matching the configured language are
/// candidates (an unrequested language would silently corrupt the clean
/// text); among candidates the caller's format hint wins, then the
/// configured preference order. Deterministic regardless of input ordering.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    hint: Option<FormatKind>,
    lang: &str,
    preference: &[FormatKind],
) -> Result<&'a CaptionTrack> {
    if tracks.is_empty() {
        return Err(ExtractError::NoCaptionsAvailable(
            "video has no caption tracks".to_string(),
        ));
    }

    let candidates: Vec<&CaptionTrack> =
        tracks.iter().filter(|t| t.language_code == lang).collect();
    if candidates.is_empty() {
        return Err(ExtractError::NoCaptionsAvailable(format!(
            "no '{lang}' caption track (languages present: {})",
            tracks
                .iter()
                .map(|t| t.language_code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    for kind in hint.iter().chain(preference.iter()) {
        if let Some(track) = candidates.iter().find(|t| t.format == *kind) {
            return Ok(track);
        }
    }

    // Language matched but no preferred format did; take what exists.
    Ok(candidates[0])
}

/// The extraction pipeline. Owns the platform client and the config value
/// object; everything else is request-scoped.
pub struct Extractor<P> {
    platform: P,
    config: Config,
}

impl<P: VideoPlatform> Extractor<P> {
    pub fn new(platform: P, config: Config) -> Self {
        Self { platform, config }
    }

    /// Extract captions as a single deduplicated text.
    pub async fn extract(&self, url: &str, hint: Option<FormatKind>) -> Result<CleanExtraction> {
        let (meta, kind, deduped) = self.run(url, hint).await?;
        Ok(CleanExtraction {
            video_id: meta.video_id,
            video_title: meta.title,
            caption_format: kind,
            content_length: deduped.clean_text.len(),
            clean_text: deduped.clean_text,
        })
    }

    /// Extract captions as timed segments.
    pub async fn extract_detailed(
        &self,
        url: &str,
        hint: Option<FormatKind>,
    ) -> Result<DetailedExtraction> {
        let (meta, kind, deduped) = self.run(url, hint).await?;
        Ok(DetailedExtraction {
            video_id: meta.video_id,
            video_title: meta.title,
            video_duration: meta.duration_seconds,
            total_captions: deduped.segments.len(),
            format: kind,
            captions: deduped.segments,
        })
    }

    async fn run(
        &self,
        url: &str,
        hint: Option<FormatKind>,
    ) -> Result<(VideoMetadata, FormatKind, clean::Deduped)> {
        let video_id =
            resolve_video_id(url).ok_or_else(|| ExtractError::InvalidUrl(url.to_string()))?;

        let meta = self.platform.fetch_metadata(&video_id).await?;
        info!(
            "Video: {} ({}), duration {:.0}s, {} track(s)",
            meta.title,
            meta.video_id,
            meta.duration_seconds,
            meta.tracks.len()
        );

        // Duration policy is enforced before any caption fetch.
        let max = self.config.max_video_duration;
        if meta.duration_seconds > max as f64 {
            return Err(ExtractError::VideoTooLong {
                actual: meta.duration_seconds,
                max,
            });
        }

        let track = select_track(
            &meta.tracks,
            hint,
            &self.config.default_lang,
            &self.config.format_preference,
        )?;
        let kind = track.format;
        debug!("Selected {} track: {}", kind, track.url);

        let payload = self.platform.fetch_caption_payload(track).await?;

        let parsed = parse::parse(kind, &payload)?;
        let normalized: Vec<CaptionSegment> = parsed
            .into_iter()
            .filter_map(|seg| {
                let text = clean::normalize(&seg.text);
                (!text.is_empty()).then_some(CaptionSegment { text, ..seg })
            })
            .collect();

        let deduped = clean::dedupe(normalized);
        if deduped.segments.is_empty() {
            return Err(ExtractError::NoCaptionsAvailable(
                "caption track contained no usable text".to_string(),
            ));
        }

        info!(
            "Extracted {} caption segment(s) from {} track",
            deduped.segments.len(),
            kind
        );
        Ok((meta, kind, deduped))
    }
}
