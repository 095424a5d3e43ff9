//! Turns an edited tree plus staged media into one submittable payload.
//!
//! The walk partitions chapters into new and existing through an
//! exhaustive tagged classification, allocates permanent identifiers for
//! the outgoing records, and pairs every new lecture with its staged file
//! by list position. Any missing piece aborts the whole build; a partial
//! payload is never produced.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::ident;
use crate::model::{Chapter, Course, Lecture};
use crate::staging::MediaStagingArea;
use crate::tree::ContentTree;

/// Course-level fields plus the new-node records, in the wire shape the
/// update endpoint expects under the `updateData` multipart field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    pub course_title: String,
    pub course_description: String,
    pub course_price: f64,
    pub discount: f64,
    pub is_published: bool,
    pub new_chapters: Vec<NewChapterRecord>,
    pub new_lectures: Vec<NewLectureRecord>,
}

/// Chapter-creation record. Carries no nested lecture list; the chapter's
/// lectures travel in `newLectures` under the allocated chapter id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapterRecord {
    pub chapter_id: String,
    pub chapter_order: u32,
    pub chapter_title: String,
}

/// Lecture-creation record. `lectureUrl` is deliberately absent: the
/// server assigns it after uploading the staged file at the same index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLectureRecord {
    pub chapter_id: String,
    pub lecture_id: String,
    pub lecture_title: String,
    pub lecture_duration: f64,
    pub is_preview_free: bool,
    pub lecture_order: u32,
}

/// Payload plus the staged files, ordered so that `media[i]` belongs to
/// `payload.new_lectures[i]`. That position correspondence is the binding
/// contract the update endpoint consumes; reordering one list without the
/// other corrupts the association.
#[derive(Debug)]
pub struct ReconcileOutput {
    pub payload: UpdatePayload,
    pub media: Vec<PathBuf>,
}

/// Exhaustive classification of a chapter at submit time.
enum ChapterClass<'a> {
    New(&'a Chapter),
    Existing(&'a Chapter),
}

/// Classifies by the `isNew` flag, falling back to identifier shape so a
/// node with a lost flag is still handled.
fn classify(chapter: &Chapter) -> ChapterClass<'_> {
    if chapter.is_new || ident::is_temporary(&chapter.chapter_id) {
        ChapterClass::New(chapter)
    } else {
        ChapterClass::Existing(chapter)
    }
}

fn is_new_lecture(lecture: &Lecture) -> bool {
    lecture.is_new || ident::is_temporary(&lecture.lecture_id)
}

pub fn build(
    course: &Course,
    tree: &ContentTree,
    staging: &MediaStagingArea,
) -> Result<ReconcileOutput, SessionError> {
    let mut new_chapters = Vec::new();
    let mut new_lectures = Vec::new();
    let mut media = Vec::new();

    for chapter in tree.chapters() {
        match classify(chapter) {
            ChapterClass::New(chapter) => {
                let permanent_chapter_id = ident::permanent();
                new_chapters.push(NewChapterRecord {
                    chapter_id: permanent_chapter_id.clone(),
                    chapter_order: chapter.chapter_order,
                    chapter_title: chapter.chapter_title.clone(),
                });
                // A new chapter's lectures are new by construction.
                for lecture in &chapter.chapter_content {
                    emit_lecture(
                        lecture,
                        &permanent_chapter_id,
                        staging,
                        &mut new_lectures,
                        &mut media,
                    )?;
                }
            }
            ChapterClass::Existing(chapter) => {
                // Only new lectures are reconciled; editing persisted
                // lectures is out of scope for this path.
                for lecture in chapter.chapter_content.iter().filter(|l| is_new_lecture(l)) {
                    emit_lecture(
                        lecture,
                        &chapter.chapter_id,
                        staging,
                        &mut new_lectures,
                        &mut media,
                    )?;
                }
            }
        }
    }

    debug_assert_eq!(new_lectures.len(), media.len());

    Ok(ReconcileOutput {
        payload: UpdatePayload {
            course_title: course.course_title.clone(),
            course_description: course.course_description.clone(),
            course_price: course.course_price,
            discount: course.discount,
            is_published: course.is_published,
            new_chapters,
            new_lectures,
        },
        media,
    })
}

fn emit_lecture(
    lecture: &Lecture,
    chapter_id: &str,
    staging: &MediaStagingArea,
    new_lectures: &mut Vec<NewLectureRecord>,
    media: &mut Vec<PathBuf>,
) -> Result<(), SessionError> {
    if lecture.lecture_title.trim().is_empty() {
        return Err(SessionError::Validation(format!(
            "new lecture {} has no title",
            lecture.lecture_id
        )));
    }
    let Some(duration) = lecture.lecture_duration else {
        return Err(SessionError::Validation(format!(
            "lecture \"{}\" has no duration",
            lecture.lecture_title
        )));
    };
    let Some(file) = staging.get(&lecture.lecture_id) else {
        return Err(SessionError::Validation(format!(
            "no media staged for lecture \"{}\"",
            lecture.lecture_title
        )));
    };

    new_lectures.push(NewLectureRecord {
        chapter_id: chapter_id.to_owned(),
        lecture_id: ident::permanent(),
        lecture_title: lecture.lecture_title.clone(),
        lecture_duration: duration,
        is_preview_free: lecture.is_preview_free,
        lecture_order: lecture.lecture_order,
    });
    media.push(file.to_owned());
    Ok(())
}
