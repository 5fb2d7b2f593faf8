//! Student management.

use super::{criteria_from_flags, outcome};
use crate::api::Transport;
use crate::cli::{AppContext, render};
use crate::core::{
    Dimension, FormController, ListState, SpreadsheetFile, StudentDraft, UploadRequest,
    UploadTarget, Uploader,
};
use crate::entities::StudentRecord;
use crate::errors::Result;
use clap::Subcommand;
use std::path::PathBuf;

/// `students` actions
#[derive(Debug, Clone, Subcommand)]
pub enum StudentAction {
    /// List students, optionally filtered
    List {
        /// Academic year, e.g. E1
        #[arg(long)]
        year: Option<String>,
        /// Branch, e.g. EEE
        #[arg(long)]
        branch: Option<String>,
        /// Section, e.g. A
        #[arg(long)]
        section: Option<String>,
        /// Matches id or name, case-insensitive
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a single student
    Add {
        /// University id
        #[arg(long)]
        id: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Academic year
        #[arg(long)]
        year: String,
        /// Branch
        #[arg(long)]
        branch: String,
        /// Section
        #[arg(long)]
        section: Option<String>,
        /// 10-digit contact number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Remove a student
    Remove {
        /// University id
        id: String,
    },
    /// Load a class from an Excel sheet
    Upload {
        /// Path to an .xlsx or .xls file
        file: PathBuf,
        /// Academic year of the class
        #[arg(long)]
        year: String,
        /// Department of the class
        #[arg(long)]
        department: String,
        /// Replace the class instead of adding to it
        #[arg(long)]
        replace: bool,
    },
}

/// Runs one `students` action.
pub async fn run<T: Transport>(ctx: &AppContext<T>, action: StudentAction) -> Result<String> {
    let numeric_years = ctx.config.api.numeric_years;
    match action {
        StudentAction::List {
            year,
            branch,
            section,
            search,
        } => {
            let criteria = criteria_from_flags(
                &ctx.config.filters,
                vec![
                    (Dimension::Year, year),
                    (Dimension::Branch, branch),
                    (Dimension::Section, section),
                ],
                search,
            )?;
            let list: ListState<StudentRecord> = ListState::new();
            list.refresh(&ctx.client).await?;
            Ok(render::list(&list.filtered(&criteria).await, &criteria))
        }
        StudentAction::Add {
            id,
            name,
            year,
            branch,
            section,
            phone,
        } => {
            let options = &ctx.config.filters;
            options.require(Dimension::Year, &year)?;
            options.require(Dimension::Branch, &branch)?;
            let form: FormController<StudentDraft> =
                FormController::create().with_numeric_years(numeric_years);
            form.update_draft(|draft| {
                *draft = StudentDraft {
                    id,
                    name,
                    year,
                    branch,
                    section: section.unwrap_or_default(),
                    phone: phone.unwrap_or_default(),
                };
            })
            .await;
            let submission = form.submit(&ctx.client, &ListState::new()).await?;
            Ok(outcome(submission, |s| {
                format!("Added student {} ({}, {} {})", s.id, s.name, s.year, s.branch)
            }))
        }
        StudentAction::Remove { id } => {
            ctx.client.delete::<StudentRecord>(&id).await?;
            Ok(format!("Removed student {id}."))
        }
        StudentAction::Upload {
            file,
            year,
            department,
            replace,
        } => {
            let request = UploadRequest::new(UploadTarget::Students)
                .with_file(SpreadsheetFile::read(&file).await?)
                .for_class(year, department)
                .replacing(replace);
            let submission = Uploader::new(numeric_years)
                .upload(&ctx.client, &request, &ctx.config.filters)
                .await?;
            Ok(outcome(submission, String::clone))
        }
    }
}
