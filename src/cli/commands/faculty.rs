//! Faculty assignment management.

use super::{criteria_from_flags, outcome};
use crate::api::Transport;
use crate::cli::{AppContext, render};
use crate::config::FilterOptions;
use crate::core::{
    Dimension, FacultyDraft, FormController, ListState, SpreadsheetFile, UploadRequest,
    UploadTarget, Uploader,
};
use crate::entities::FacultyRecord;
use crate::errors::{Error, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Field values of an assignment. On `update` every field is optional and overrides
/// the stored value.
#[derive(Debug, Clone, Default, Args)]
pub struct FacultyFields {
    /// Faculty staff id
    #[arg(long)]
    pub id: Option<String>,
    /// Faculty name
    #[arg(long)]
    pub name: Option<String>,
    /// Subject code, e.g. CS3101
    #[arg(long)]
    pub subject_code: Option<String>,
    /// Department teaching the subject
    #[arg(long)]
    pub department: Option<String>,
    /// Academic year of the class
    #[arg(long)]
    pub year: Option<String>,
    /// Section of the class
    #[arg(long)]
    pub section: Option<String>,
}

impl FacultyFields {
    fn apply(self, draft: &mut FacultyDraft) {
        let targets = [
            (self.id, &mut draft.id),
            (self.name, &mut draft.name),
            (self.subject_code, &mut draft.subject_code),
            (self.department, &mut draft.department),
            (self.year, &mut draft.year),
            (self.section, &mut draft.section),
        ];
        for (value, field) in targets {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    fn check_options(&self, options: &FilterOptions) -> Result<()> {
        let pairs = [
            (Dimension::Department, &self.department),
            (Dimension::Year, &self.year),
            (Dimension::Section, &self.section),
        ];
        for (dimension, value) in pairs {
            if let Some(value) = value {
                options.require(dimension, value)?;
            }
        }
        Ok(())
    }
}

/// `faculty` actions
#[derive(Debug, Clone, Subcommand)]
pub enum FacultyAction {
    /// List faculty assignments, optionally filtered
    List {
        /// Department, e.g. ECE
        #[arg(long)]
        department: Option<String>,
        /// Academic year, e.g. E3
        #[arg(long)]
        year: Option<String>,
        /// Section, e.g. B
        #[arg(long)]
        section: Option<String>,
        /// Matches name, staff id or subject code, case-insensitive
        #[arg(long)]
        search: Option<String>,
    },
    /// Assign a subject to a faculty member
    Add(FacultyFields),
    /// Change an existing assignment
    Update {
        /// Assignment id shown by `faculty list`
        assignment_id: i64,
        #[command(flatten)]
        fields: FacultyFields,
    },
    /// Remove an assignment
    Remove {
        /// Assignment id shown by `faculty list`
        assignment_id: i64,
    },
    /// Load assignments from an Excel sheet
    Upload {
        /// Path to an .xlsx or .xls file
        file: PathBuf,
    },
}

/// Runs one `faculty` action.
pub async fn run<T: Transport>(ctx: &AppContext<T>, action: FacultyAction) -> Result<String> {
    let list: ListState<FacultyRecord> = ListState::new();
    let numeric_years = ctx.config.api.numeric_years;
    match action {
        FacultyAction::List {
            department,
            year,
            section,
            search,
        } => {
            let criteria = criteria_from_flags(
                &ctx.config.filters,
                vec![
                    (Dimension::Department, department),
                    (Dimension::Year, year),
                    (Dimension::Section, section),
                ],
                search,
            )?;
            list.refresh(&ctx.client).await?;
            Ok(render::list(&list.filtered(&criteria).await, &criteria))
        }
        FacultyAction::Add(fields) => {
            fields.check_options(&ctx.config.filters)?;
            let form: FormController<FacultyDraft> =
                FormController::create().with_numeric_years(numeric_years);
            form.update_draft(|draft| fields.apply(draft)).await;
            let submission = form.submit(&ctx.client, &list).await?;
            Ok(outcome(submission, |f| {
                format!(
                    "Assigned {} to {} ({} {} {}) as #{}",
                    f.subject_code, f.name, f.department, f.year, f.section, f.assignment_id
                )
            }))
        }
        FacultyAction::Update {
            assignment_id,
            fields,
        } => {
            fields.check_options(&ctx.config.filters)?;
            list.refresh(&ctx.client).await?;
            let key = assignment_id.to_string();
            let existing = list.get(&key).await.ok_or_else(|| {
                Error::validation("assignment_id", format!("no assignment #{key}"))
            })?;

            let mut draft = FacultyDraft::from(&existing);
            fields.apply(&mut draft);
            let form = FormController::edit(key, draft).with_numeric_years(numeric_years);
            let submission = form.submit(&ctx.client, &list).await?;
            Ok(outcome(submission, |f| {
                format!("Updated assignment #{}", f.assignment_id)
            }))
        }
        FacultyAction::Remove { assignment_id } => {
            let key = assignment_id.to_string();
            ctx.client.delete::<FacultyRecord>(&key).await?;
            Ok(format!("Removed assignment #{key}."))
        }
        FacultyAction::Upload { file } => {
            let request =
                UploadRequest::new(UploadTarget::Faculty).with_file(SpreadsheetFile::read(&file).await?);
            let submission = Uploader::new(numeric_years)
                .upload(&ctx.client, &request, &ctx.config.filters)
                .await?;
            let Some(message) = submission.applied() else {
                return Ok("An upload is already in progress.".to_string());
            };
            // The upload endpoint returns no records, so reload the list.
            let loaded = list.refresh(&ctx.client).await?;
            info!("Faculty list reloaded after upload");
            Ok(format!("{message}\n{loaded} faculty assignments loaded."))
        }
    }
}
