use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    lectern::logging::init().context("init logging")?;

    let cli = lectern::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        lectern::cli::Command::Course {
            command: lectern::cli::CourseCommand::Show(args),
        } => {
            lectern::commands::show(args).await.context("course show")?;
        }
        lectern::cli::Command::Course {
            command: lectern::cli::CourseCommand::DeleteChapter(args),
        } => {
            lectern::commands::delete_chapter(args)
                .await
                .context("course delete-chapter")?;
        }
        lectern::cli::Command::Course {
            command: lectern::cli::CourseCommand::DeleteLecture(args),
        } => {
            lectern::commands::delete_lecture(args)
                .await
                .context("course delete-lecture")?;
        }
    }

    Ok(())
}
