//! In-memory chapter/lecture hierarchy for an editing session.
//!
//! Every operation produces a new tree value instead of mutating nodes in
//! place, so a read in progress never observes a partial edit. Network
//! round-trips for persisted-node removal live at the session layer; the
//! tree itself is purely structural.

use crate::error::SessionError;
use crate::ident;
use crate::model::{Chapter, Course, Lecture};

#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    chapters: Vec<Chapter>,
}

/// A single typed field edit on a lecture. Numeric inputs are coerced at
/// the point of edit; an empty input stays an explicit empty value.
#[derive(Debug, Clone, PartialEq)]
pub enum LectureEdit {
    Title(String),
    Duration(Option<f64>),
    Order(u32),
    PreviewFree(bool),
}

impl LectureEdit {
    /// Parses a raw duration input. Empty input is retained as `None`
    /// rather than coerced to zero, so an in-progress edit is not
    /// corrupted.
    pub fn duration_from_input(raw: &str) -> Result<Self, SessionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::Duration(None));
        }
        let seconds: f64 = raw
            .parse()
            .map_err(|_| SessionError::Validation(format!("invalid duration: {raw:?}")))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SessionError::Validation(format!(
                "duration must be a non-negative number of seconds: {raw:?}"
            )));
        }
        Ok(Self::Duration(Some(seconds)))
    }

    pub fn order_from_input(raw: &str) -> Result<Self, SessionError> {
        let raw = raw.trim();
        let order: u32 = raw
            .parse()
            .map_err(|_| SessionError::Validation(format!("invalid display order: {raw:?}")))?;
        Ok(Self::Order(order))
    }
}

impl ContentTree {
    pub fn from_course(course: &Course) -> Self {
        Self {
            chapters: course.course_content.clone(),
        }
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, chapter_index: usize) -> Result<&Chapter, SessionError> {
        self.chapters.get(chapter_index).ok_or_else(|| {
            SessionError::NotFound(format!("chapter index {chapter_index} out of range"))
        })
    }

    pub fn lecture(
        &self,
        chapter_index: usize,
        lecture_index: usize,
    ) -> Result<&Lecture, SessionError> {
        self.chapter(chapter_index)?
            .chapter_content
            .get(lecture_index)
            .ok_or_else(|| {
                SessionError::NotFound(format!(
                    "lecture index {lecture_index} out of range in chapter {chapter_index}"
                ))
            })
    }

    /// True if any chapter or lecture in the tree carries this identifier.
    pub fn contains_id(&self, id: &str) -> bool {
        self.chapters.iter().any(|c| {
            c.chapter_id == id || c.chapter_content.iter().any(|l| l.lecture_id == id)
        })
    }

    /// Appends a new chapter with a fresh temporary identifier.
    pub fn add_chapter(&self) -> ContentTree {
        let mut next = self.clone();
        next.chapters.push(Chapter {
            chapter_id: ident::temporary(),
            chapter_order: self.chapters.len() as u32 + 1,
            chapter_title: String::new(),
            chapter_content: Vec::new(),
            is_new: true,
        });
        next
    }

    pub fn rename_chapter(
        &self,
        chapter_index: usize,
        title: impl Into<String>,
    ) -> Result<ContentTree, SessionError> {
        self.chapter(chapter_index)?;
        let mut next = self.clone();
        next.chapters[chapter_index].chapter_title = title.into();
        Ok(next)
    }

    /// Appends a new lecture to the chapter. Lectures added through an
    /// editing session are always new; a new chapter therefore only ever
    /// contains new lectures.
    pub fn add_lecture(&self, chapter_index: usize) -> Result<ContentTree, SessionError> {
        let chapter = self.chapter(chapter_index)?;
        let lecture = Lecture {
            lecture_id: ident::temporary(),
            lecture_title: String::new(),
            lecture_duration: None,
            lecture_url: String::new(),
            is_preview_free: false,
            lecture_order: chapter.chapter_content.len() as u32 + 1,
            is_new: true,
            transcript: Vec::new(),
        };
        let mut next = self.clone();
        next.chapters[chapter_index].chapter_content.push(lecture);
        Ok(next)
    }

    pub fn edit_lecture(
        &self,
        chapter_index: usize,
        lecture_index: usize,
        edit: LectureEdit,
    ) -> Result<ContentTree, SessionError> {
        self.lecture(chapter_index, lecture_index)?;
        let mut next = self.clone();
        let lecture = &mut next.chapters[chapter_index].chapter_content[lecture_index];
        match edit {
            LectureEdit::Title(title) => lecture.lecture_title = title,
            LectureEdit::Duration(seconds) => lecture.lecture_duration = seconds,
            LectureEdit::Order(order) => lecture.lecture_order = order,
            LectureEdit::PreviewFree(free) => lecture.is_preview_free = free,
        }
        Ok(next)
    }

    pub fn remove_chapter(&self, chapter_index: usize) -> Result<ContentTree, SessionError> {
        self.chapter(chapter_index)?;
        let mut next = self.clone();
        next.chapters.remove(chapter_index);
        Ok(next)
    }

    pub fn remove_lecture(
        &self,
        chapter_index: usize,
        lecture_index: usize,
    ) -> Result<ContentTree, SessionError> {
        self.lecture(chapter_index, lecture_index)?;
        let mut next = self.clone();
        next.chapters[chapter_index]
            .chapter_content
            .remove(lecture_index);
        Ok(next)
    }

    pub fn has_new_nodes(&self) -> bool {
        self.chapters
            .iter()
            .any(|c| c.is_new || c.chapter_content.iter().any(|l| l.is_new))
    }
}
