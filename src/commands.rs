//! CLI command bodies.

use anyhow::Context as _;

use crate::cli::{CourseShowArgs, DeleteChapterArgs, DeleteLectureArgs};
use crate::config::RemoteConfig;
use crate::model::{discounted_price, format_duration};
use crate::sync::RemoteSync;

pub async fn show(args: CourseShowArgs) -> anyhow::Result<()> {
    let config = RemoteConfig::from_env().context("load remote config")?;
    let remote = RemoteSync::from_config(&config);

    let course = remote
        .get_course(&args.course_id)
        .await
        .context("fetch course")?;

    println!("{}", course.course_title);
    if !course.course_description.is_empty() {
        println!("{}", course.course_description);
    }
    println!(
        "price: {:.2} (after {}% discount: {:.2})",
        course.course_price,
        course.discount,
        discounted_price(course.course_price, course.discount)
    );
    println!(
        "status: {}",
        if course.is_published {
            "published"
        } else {
            "not published"
        }
    );

    for (idx, chapter) in course.sorted_chapters().iter().enumerate() {
        println!();
        println!("Chapter {}: {}", idx + 1, chapter.chapter_title);
        for lecture in chapter.sorted_lectures() {
            let duration = lecture
                .lecture_duration
                .map(format_duration)
                .unwrap_or_else(|| "--:--".to_owned());
            let preview = if lecture.is_preview_free {
                " [preview]"
            } else {
                ""
            };
            println!("  {} ({duration}){preview}", lecture.lecture_title);
        }
        if chapter.chapter_content.is_empty() {
            println!("  (no lectures yet)");
        }
    }

    Ok(())
}

pub async fn delete_chapter(args: DeleteChapterArgs) -> anyhow::Result<()> {
    let config = RemoteConfig::from_env().context("load remote config")?;
    let remote = RemoteSync::from_config(&config);

    match remote.delete_chapter(&args.course_id, &args.chapter_id).await {
        Ok(()) => {
            println!("deleted chapter {}", args.chapter_id);
            Ok(())
        }
        // Soft failure: the target is already gone.
        Err(err) if err.is_not_found() => {
            tracing::warn!(chapter_id = %args.chapter_id, "chapter not found on server");
            println!("chapter {} was already removed", args.chapter_id);
            Ok(())
        }
        Err(err) => Err(err).context("delete chapter"),
    }
}

pub async fn delete_lecture(args: DeleteLectureArgs) -> anyhow::Result<()> {
    let config = RemoteConfig::from_env().context("load remote config")?;
    let remote = RemoteSync::from_config(&config);

    match remote
        .delete_lecture(&args.course_id, &args.chapter_id, &args.lecture_id)
        .await
    {
        Ok(()) => {
            println!("deleted lecture {}", args.lecture_id);
            Ok(())
        }
        Err(err) if err.is_not_found() => {
            tracing::warn!(lecture_id = %args.lecture_id, "lecture not found on server");
            println!("lecture {} was already removed", args.lecture_id);
            Ok(())
        }
        Err(err) => Err(err).context("delete lecture"),
    }
}
