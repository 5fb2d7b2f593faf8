//! Subject catalogue and schedule uploads.

use super::outcome;
use crate::api::Transport;
use crate::cli::AppContext;
use crate::core::{SpreadsheetFile, UploadRequest, UploadTarget, Uploader};
use crate::errors::Result;
use clap::Subcommand;
use std::path::PathBuf;

/// `subjects` actions
#[derive(Debug, Clone, Subcommand)]
pub enum SubjectAction {
    /// Load the subject catalogue from an Excel sheet
    Upload {
        /// Path to an .xlsx or .xls file
        file: PathBuf,
        /// Replace the catalogue instead of adding to it
        #[arg(long)]
        replace: bool,
    },
}

/// `schedules` actions
#[derive(Debug, Clone, Subcommand)]
pub enum ScheduleAction {
    /// Load a class timetable from an Excel sheet
    Upload {
        /// Path to an .xlsx or .xls file
        file: PathBuf,
        /// Academic year of the class
        #[arg(long)]
        year: String,
        /// Department of the class
        #[arg(long)]
        department: String,
        /// Replace the timetable instead of adding to it
        #[arg(long)]
        replace: bool,
    },
}

async fn send<T: Transport>(ctx: &AppContext<T>, request: &UploadRequest) -> Result<String> {
    let submission = Uploader::new(ctx.config.api.numeric_years)
        .upload(&ctx.client, request, &ctx.config.filters)
        .await?;
    Ok(outcome(submission, String::clone))
}

/// Runs one `subjects` action.
pub async fn run_subjects<T: Transport>(ctx: &AppContext<T>, action: SubjectAction) -> Result<String> {
    let SubjectAction::Upload { file, replace } = action;
    let request = UploadRequest::new(UploadTarget::Subjects)
        .with_file(SpreadsheetFile::read(&file).await?)
        .replacing(replace);
    send(ctx, &request).await
}

/// Runs one `schedules` action.
pub async fn run_schedules<T: Transport>(
    ctx: &AppContext<T>,
    action: ScheduleAction,
) -> Result<String> {
    let ScheduleAction::Upload {
        file,
        year,
        department,
        replace,
    } = action;
    let request = UploadRequest::new(UploadTarget::FacultySchedules)
        .with_file(SpreadsheetFile::read(&file).await?)
        .for_class(year, department)
        .replacing(replace);
    send(ctx, &request).await
}
