//! The editing session: one educator, one course, one working tree.
//!
//! Created on entering the edit view, discarded on navigation away or
//! after a terminal submit. All structural edits are local and optimistic;
//! `submit` is the single linear async routine that reconciles, exchanges,
//! and on success replaces local state wholesale with the server's answer.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SessionError;
use crate::model::Course;
use crate::reconcile;
use crate::staging::MediaStagingArea;
use crate::sync::RemoteSync;
use crate::tree::{ContentTree, LectureEdit};

pub struct EditSession {
    course: Course,
    tree: ContentTree,
    staging: MediaStagingArea,
    in_flight: Arc<AtomicBool>,
}

/// Releases the submit gate when dropped, also on the failure paths.
pub struct SubmitGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl EditSession {
    /// Opens a session by loading the authoritative tree.
    pub async fn open(remote: &RemoteSync, course_id: &str) -> Result<Self, SessionError> {
        let course = remote.get_course(course_id).await?;
        tracing::info!(
            course_id,
            chapters = course.course_content.len(),
            "edit session opened"
        );
        Ok(Self::from_course(course))
    }

    /// Builds a session around already-fetched course data.
    pub fn from_course(course: Course) -> Self {
        let tree = ContentTree::from_course(&course);
        Self {
            course,
            tree,
            staging: MediaStagingArea::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn staging(&self) -> &MediaStagingArea {
        &self.staging
    }

    pub fn submit_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.course.course_title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.course.course_description = description.into();
    }

    pub fn set_price(&mut self, price: f64) {
        self.course.course_price = price;
    }

    pub fn set_discount(&mut self, discount: f64) {
        self.course.discount = discount;
    }

    pub fn set_published(&mut self, published: bool) {
        self.course.is_published = published;
    }

    pub fn add_chapter(&mut self) {
        self.tree = self.tree.add_chapter();
    }

    pub fn rename_chapter(
        &mut self,
        chapter_index: usize,
        title: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.tree = self.tree.rename_chapter(chapter_index, title)?;
        Ok(())
    }

    pub fn add_lecture(&mut self, chapter_index: usize) -> Result<(), SessionError> {
        self.tree = self.tree.add_lecture(chapter_index)?;
        Ok(())
    }

    pub fn edit_lecture(
        &mut self,
        chapter_index: usize,
        lecture_index: usize,
        edit: LectureEdit,
    ) -> Result<(), SessionError> {
        self.tree = self.tree.edit_lecture(chapter_index, lecture_index, edit)?;
        Ok(())
    }

    /// Stages a locally selected file against a new lecture. Persisted
    /// lectures already have server media and never take staged files.
    pub fn stage_media(
        &mut self,
        chapter_index: usize,
        lecture_index: usize,
        file: impl Into<PathBuf>,
    ) -> Result<(), SessionError> {
        let lecture = self.tree.lecture(chapter_index, lecture_index)?;
        if !lecture.is_new {
            return Err(SessionError::Validation(format!(
                "lecture \"{}\" is already persisted and takes no staged media",
                lecture.lecture_title
            )));
        }
        self.staging.stage(lecture.lecture_id.clone(), file);
        Ok(())
    }

    /// Removes a chapter. New chapters go immediately with no network
    /// call; persisted chapters round-trip through the delete contract
    /// first and stay in the tree if that fails (fail closed).
    pub async fn remove_chapter(
        &mut self,
        remote: &RemoteSync,
        chapter_index: usize,
    ) -> Result<(), SessionError> {
        let chapter = self.tree.chapter(chapter_index)?;

        if chapter.is_new {
            for lecture in &chapter.chapter_content {
                self.staging.remove(&lecture.lecture_id);
            }
            self.tree = self.tree.remove_chapter(chapter_index)?;
            return Ok(());
        }

        if self.submit_pending() {
            return Err(SessionError::SubmitInProgress);
        }

        let chapter_id = chapter.chapter_id.clone();
        match remote.delete_chapter(&self.course.id, &chapter_id).await {
            Ok(()) => {
                self.tree = self.tree.remove_chapter(chapter_index)?;
                Ok(())
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(%chapter_id, "delete target already gone on server");
                }
                Err(err)
            }
        }
    }

    pub async fn remove_lecture(
        &mut self,
        remote: &RemoteSync,
        chapter_index: usize,
        lecture_index: usize,
    ) -> Result<(), SessionError> {
        let lecture = self.tree.lecture(chapter_index, lecture_index)?;

        if lecture.is_new {
            self.staging.remove(&lecture.lecture_id);
            self.tree = self.tree.remove_lecture(chapter_index, lecture_index)?;
            return Ok(());
        }

        if self.submit_pending() {
            return Err(SessionError::SubmitInProgress);
        }

        let chapter_id = self.tree.chapter(chapter_index)?.chapter_id.clone();
        let lecture_id = lecture.lecture_id.clone();
        match remote
            .delete_lecture(&self.course.id, &chapter_id, &lecture_id)
            .await
        {
            Ok(()) => {
                self.tree = self.tree.remove_lecture(chapter_index, lecture_index)?;
                Ok(())
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(%lecture_id, "delete target already gone on server");
                }
                Err(err)
            }
        }
    }

    /// Takes the submit gate. A second call while a submit is pending is
    /// rejected, not queued.
    pub fn begin_submit(&self) -> Result<SubmitGuard, SessionError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SessionError::SubmitInProgress);
        }
        Ok(SubmitGuard {
            flag: Arc::clone(&self.in_flight),
        })
    }

    /// Reconciles and submits the whole edited tree as one atomic update.
    /// On success local state is replaced by the server's authoritative
    /// course and the staging area is cleared; on any failure both are
    /// left exactly as they were.
    pub async fn submit(&mut self, remote: &RemoteSync) -> Result<&Course, SessionError> {
        let _guard = self.begin_submit()?;

        let output = reconcile::build(&self.course, &self.tree, &self.staging)?;
        let course = remote
            .submit(&self.course.id, &output.payload, &output.media)
            .await?;

        self.tree = ContentTree::from_course(&course);
        self.course = course;
        self.staging.clear();
        tracing::info!(
            course_id = %self.course.id,
            chapters = self.course.course_content.len(),
            "local tree replaced by authoritative course"
        );
        Ok(&self.course)
    }

    /// Re-fetches the authoritative tree, discarding local edits. Used
    /// when the session's course identifier changes under it.
    pub async fn reload(&mut self, remote: &RemoteSync) -> Result<(), SessionError> {
        if self.submit_pending() {
            return Err(SessionError::SubmitInProgress);
        }
        let course = remote.get_course(&self.course.id).await?;
        self.tree = ContentTree::from_course(&course);
        self.course = course;
        self.staging.clear();
        Ok(())
    }
}
