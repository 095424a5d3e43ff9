//! Network exchange with the course backend.
//!
//! One multipart request carries the reconciled payload and the staged
//! media, in the exact order the reconciler produced. Nothing here patches
//! local state; callers replace their tree wholesale from the returned
//! authoritative course or keep what they had.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::auth::{StaticToken, TokenProvider};
use crate::config::RemoteConfig;
use crate::error::SessionError;
use crate::model::Course;
use crate::reconcile::UpdatePayload;

#[derive(Clone)]
pub struct RemoteSync {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseEnvelope {
    course_data: Course,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    course: Option<Course>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

impl RemoteSync {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            tokens,
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Arc::new(StaticToken::new(config.auth_token.clone())),
        )
    }

    async fn authorize(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, SessionError> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|err| SessionError::Network(format!("fetch auth token: {err:#}")))?;
        Ok(match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Course, SessionError> {
        let url = format!("{}/api/course/{course_id}", self.base_url);
        let req = self.authorize(self.client.get(&url)).await?;
        let response = req.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SessionError::NotFound(format!("course {course_id}")));
        }
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SessionError::Network(error_message(&raw, status)));
        }

        let envelope: CourseEnvelope = serde_json::from_str(&raw)
            .map_err(|err| SessionError::Network(format!("parse course response: {err}")))?;
        Ok(envelope.course_data)
    }

    /// Submits the reconciled payload and the staged media as one multipart
    /// exchange. `media[i]` must belong to `payload.new_lectures[i]`.
    pub async fn submit(
        &self,
        course_id: &str,
        payload: &UpdatePayload,
        media: &[PathBuf],
    ) -> Result<Course, SessionError> {
        let update_data = serde_json::to_string(payload)
            .map_err(|err| SessionError::Validation(format!("serialize update payload: {err}")))?;

        let mut form = Form::new().text("updateData", update_data);
        for path in media {
            form = form.part("videos", file_part(path).await?);
        }

        let url = format!("{}/api/educator/edit-course/{course_id}", self.base_url);
        let req = self.authorize(self.client.put(&url)).await?;
        let response = req.multipart(form).send().await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SessionError::Network(error_message(&raw, status)));
        }

        let parsed: UpdateResponse = serde_json::from_str(&raw)
            .map_err(|err| SessionError::Network(format!("parse update response: {err}")))?;
        if !parsed.success {
            return Err(SessionError::Network(parsed.message));
        }
        let course = parsed.course.ok_or_else(|| {
            SessionError::Network("update response carried no course".to_owned())
        })?;

        tracing::info!(
            course_id,
            new_chapters = payload.new_chapters.len(),
            new_lectures = payload.new_lectures.len(),
            "course update accepted"
        );
        Ok(course)
    }

    pub async fn delete_chapter(
        &self,
        course_id: &str,
        chapter_id: &str,
    ) -> Result<(), SessionError> {
        let url = format!(
            "{}/api/educator/course/{course_id}/chapter/{chapter_id}",
            self.base_url
        );
        self.delete(&url, &format!("chapter {chapter_id}")).await
    }

    pub async fn delete_lecture(
        &self,
        course_id: &str,
        chapter_id: &str,
        lecture_id: &str,
    ) -> Result<(), SessionError> {
        let url = format!(
            "{}/api/educator/course/{course_id}/chapter/{chapter_id}/lecture/{lecture_id}",
            self.base_url
        );
        self.delete(&url, &format!("lecture {lecture_id}")).await
    }

    /// Idempotent from the caller's perspective: deleting an already-gone
    /// node comes back as `NotFound`, a soft failure.
    async fn delete(&self, url: &str, what: &str) -> Result<(), SessionError> {
        let req = self.authorize(self.client.delete(url)).await?;
        let response = req.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SessionError::NotFound(what.to_owned()));
        }
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SessionError::Network(error_message(&raw, status)));
        }

        let parsed: DeleteResponse = serde_json::from_str(&raw)
            .map_err(|err| SessionError::Network(format!("parse delete response: {err}")))?;
        if !parsed.success {
            return Err(SessionError::Network(parsed.message));
        }
        Ok(())
    }
}

async fn file_part(path: &Path) -> Result<Part, SessionError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        SessionError::Validation(format!("read staged media {}: {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "lecture.mp4".to_owned());
    Ok(Part::bytes(bytes).file_name(file_name))
}

fn error_message(raw_body: &str, status: StatusCode) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(raw_body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned));
    match parsed {
        Some(message) => format!("server error ({status}): {message}"),
        None => format!("server error ({status}): {raw_body}"),
    }
}
