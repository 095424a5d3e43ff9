//! Clients for the external transcription and summarization services.
//!
//! Both are black boxes behind trait seams: audio bytes in, time-segmented
//! text out; segments in, labeled notes out. Failures leave whatever the
//! caller already had intact.

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::local_store::{self, KeyValueStore, SUMMARY_NOTES_KEY};
use crate::model::{SummaryNote, TranscriptSegment};

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        media: Vec<u8>,
        course_id: &str,
        chapter_id: &str,
        lecture_id: &str,
    ) -> anyhow::Result<Vec<TranscriptSegment>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        segments: &[TranscriptSegment],
        lecture_id: &str,
    ) -> anyhow::Result<Vec<SummaryNote>>;
}

#[derive(Clone)]
pub struct HttpAiService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    transcription: TranscriptionBody,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptionBody {
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    theories: Vec<SummaryNote>,
}

impl HttpAiService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for HttpAiService {
    async fn transcribe(
        &self,
        media: Vec<u8>,
        course_id: &str,
        chapter_id: &str,
        lecture_id: &str,
    ) -> anyhow::Result<Vec<TranscriptSegment>> {
        let endpoint = format!("{}/api/ai/transcribe", self.base_url);
        let form = Form::new()
            .text("courseId", course_id.to_owned())
            .text("chapterId", chapter_id.to_owned())
            .text("lectureId", lecture_id.to_owned())
            .part("file", Part::bytes(media).file_name("lecture.mp4"));

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {endpoint}"))?;

        let status = response.status();
        let raw = response.text().await.context("read transcribe response")?;
        if !status.is_success() {
            anyhow::bail!("transcription service error ({status}): {raw}");
        }

        let envelope: TranscriptionEnvelope =
            serde_json::from_str(&raw).context("parse transcribe response")?;
        if !envelope.success {
            anyhow::bail!("transcription service reported failure");
        }

        tracing::info!(
            lecture_id,
            segments = envelope.transcription.segments.len(),
            "transcription received"
        );
        Ok(envelope.transcription.segments)
    }
}

#[async_trait]
impl Summarizer for HttpAiService {
    async fn summarize(
        &self,
        segments: &[TranscriptSegment],
        lecture_id: &str,
    ) -> anyhow::Result<Vec<SummaryNote>> {
        let endpoint = format!("{}/api/ai/generate-summary", self.base_url);
        let body = serde_json::json!({
            "segments": segments,
            "lectureId": lecture_id,
        });

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {endpoint}"))?;

        let status = response.status();
        let raw = response.text().await.context("read summary response")?;
        if !status.is_success() {
            anyhow::bail!("summarization service error ({status}): {raw}");
        }

        let envelope: SummaryEnvelope =
            serde_json::from_str(&raw).context("parse summary response")?;
        if !envelope.success {
            anyhow::bail!("summarization service reported failure");
        }
        Ok(envelope.theories)
    }
}

/// Generates notes for a lecture and persists the whole array under the
/// fixed notes key, replacing whatever was stored before.
pub async fn generate_and_store_notes(
    summarizer: &dyn Summarizer,
    store: &dyn KeyValueStore,
    segments: &[TranscriptSegment],
    lecture_id: &str,
) -> anyhow::Result<Vec<SummaryNote>> {
    let notes = summarizer
        .summarize(segments, lecture_id)
        .await
        .context("summarize transcript")?;
    local_store::put(store, SUMMARY_NOTES_KEY, &notes)
        .await
        .context("persist summary notes")?;
    tracing::info!(lecture_id, notes = notes.len(), "summary notes stored");
    Ok(notes)
}
