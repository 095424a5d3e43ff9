use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or edit a course on the configured backend.
    Course {
        #[command(subcommand)]
        command: CourseCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Print a course's metadata and curriculum.
    Show(CourseShowArgs),
    /// Delete a persisted chapter, including its lectures.
    DeleteChapter(DeleteChapterArgs),
    /// Delete a single persisted lecture.
    DeleteLecture(DeleteLectureArgs),
}

#[derive(Debug, Args)]
pub struct CourseShowArgs {
    /// Course identifier.
    pub course_id: String,
}

#[derive(Debug, Args)]
pub struct DeleteChapterArgs {
    /// Course identifier.
    pub course_id: String,

    /// Persisted chapter identifier to delete.
    pub chapter_id: String,
}

#[derive(Debug, Args)]
pub struct DeleteLectureArgs {
    /// Course identifier.
    pub course_id: String,

    /// Chapter holding the lecture.
    pub chapter_id: String,

    /// Persisted lecture identifier to delete.
    pub lecture_id: String,
}
