//! Playback-position-to-segment alignment.
//!
//! Two independent input events feed the same resolution function: a
//! manual scrub expressed as a percentage of the media duration, and an
//! absolute position reported by the player on seek or progress. Both
//! resolve through [`find_segment`], which is a pure function of
//! `(segments, seconds)`.

use std::sync::Arc;

use anyhow::Context as _;

use crate::ai::Transcriber;
use crate::local_store::{self, CAPTION_KEY, KeyValueStore};
use crate::model::{Lecture, TranscriptSegment};

/// First segment in sequence order with `start <= seconds <= end`.
/// Boundaries are inclusive on both ends, so when one segment's `end`
/// equals the next one's `start`, the earlier segment wins.
pub fn find_segment(segments: &[TranscriptSegment], seconds: f64) -> Option<&TranscriptSegment> {
    segments
        .iter()
        .find(|s| s.start <= seconds && seconds <= s.end)
}

pub struct TranscriptAligner {
    segments: Vec<TranscriptSegment>,
    active_text: String,
    last_position_seconds: f64,
    store: Arc<dyn KeyValueStore>,
}

impl TranscriptAligner {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            segments: Vec::new(),
            active_text: String::new(),
            last_position_seconds: 0.0,
            store,
        }
    }

    pub fn set_segments(&mut self, segments: Vec<TranscriptSegment>) {
        self.segments = segments;
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    /// The caption currently on display. Unchanged when a position falls
    /// in a gap or past the last segment.
    pub fn active_text(&self) -> &str {
        &self.active_text
    }

    pub fn last_position_seconds(&self) -> f64 {
        self.last_position_seconds
    }

    /// Manual scrub: a 0-100 percentage of the externally reported total
    /// duration. Returns the newly active caption, if the position
    /// resolved to a segment.
    pub async fn on_scrub(
        &mut self,
        percent: f64,
        total_duration_seconds: f64,
    ) -> anyhow::Result<Option<&str>> {
        let percent = percent.clamp(0.0, 100.0);
        let seconds = total_duration_seconds * percent / 100.0;
        self.resolve(seconds).await
    }

    /// Player-reported position in absolute seconds, fired on seek or
    /// playback progress.
    pub async fn on_player_position(&mut self, seconds: f64) -> anyhow::Result<Option<&str>> {
        self.resolve(seconds).await
    }

    async fn resolve(&mut self, seconds: f64) -> anyhow::Result<Option<&str>> {
        self.last_position_seconds = seconds;

        let Some(segment) = find_segment(&self.segments, seconds) else {
            return Ok(None);
        };
        let text = segment.text.clone();

        local_store::put(self.store.as_ref(), CAPTION_KEY, &text)
            .await
            .context("persist caption")?;
        self.active_text = text;
        Ok(Some(&self.active_text))
    }
}

/// Fetches a lecture's transcript, invoking the collaborator only when the
/// lecture does not already hold one. Idempotent: a non-empty cached
/// transcript is returned as-is with no network call.
pub async fn ensure_transcript(
    transcriber: &dyn Transcriber,
    media: Vec<u8>,
    course_id: &str,
    chapter_id: &str,
    lecture: &mut Lecture,
) -> anyhow::Result<Vec<TranscriptSegment>> {
    if !lecture.transcript.is_empty() {
        tracing::debug!(
            lecture_id = %lecture.lecture_id,
            "transcript already cached"
        );
        return Ok(lecture.transcript.clone());
    }

    let segments = transcriber
        .transcribe(media, course_id, chapter_id, &lecture.lecture_id)
        .await
        .context("transcribe lecture media")?;
    lecture.transcript = segments.clone();
    Ok(segments)
}
