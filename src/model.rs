use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level learning unit, in the wire shape the backend speaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_title: String,
    #[serde(default)]
    pub course_description: String,
    #[serde(default)]
    pub course_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub course_content: Vec<Chapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Chapters in display order. Orders are not required to be contiguous.
    pub fn sorted_chapters(&self) -> Vec<&Chapter> {
        let mut chapters = self.course_content.iter().collect::<Vec<_>>();
        chapters.sort_by_key(|c| c.chapter_order);
        chapters
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_id: String,
    pub chapter_order: u32,
    pub chapter_title: String,
    #[serde(default)]
    pub chapter_content: Vec<Lecture>,
    /// Client-side flag: true until the chapter has server identity.
    /// Absent in server JSON.
    #[serde(default)]
    pub is_new: bool,
}

impl Chapter {
    pub fn sorted_lectures(&self) -> Vec<&Lecture> {
        let mut lectures = self.chapter_content.iter().collect::<Vec<_>>();
        lectures.sort_by_key(|l| l.lecture_order);
        lectures
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub lecture_id: String,
    #[serde(default)]
    pub lecture_title: String,
    /// Seconds. `None` while an edit has cleared the field; never coerced
    /// to zero mid-edit.
    #[serde(default)]
    pub lecture_duration: Option<f64>,
    /// Empty until the server has uploaded the staged media.
    #[serde(default)]
    pub lecture_url: String,
    #[serde(default)]
    pub is_preview_free: bool,
    #[serde(default)]
    pub lecture_order: u32,
    #[serde(default)]
    pub is_new: bool,
    /// Client-side transcript cache, empty until transcription completes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<TranscriptSegment>,
}

/// Time-bounded span of spoken text, produced by the transcription
/// collaborator. Ordered and non-overlapping by construction, not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Labeled study note generated from a transcript. Display-session
/// artifact, not part of persisted Course state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryNote {
    pub range: String,
    pub theory: String,
}

/// Formats a duration in seconds as `MM:SS`, or `HH:MM:SS` past an hour.
pub fn format_duration(total_seconds: f64) -> String {
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return "00:00".to_owned();
    }

    let total = total_seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Price after applying a percentage discount, clamped to 0..=100.
pub fn discounted_price(price: f64, discount_percent: f64) -> f64 {
    let discount = discount_percent.clamp(0.0, 100.0);
    price * (1.0 - discount / 100.0)
}
