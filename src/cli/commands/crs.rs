//! Class representative management.

use super::{criteria_from_flags, outcome};
use crate::api::Transport;
use crate::cli::{AppContext, render};
use crate::core::{CrDraft, Dimension, FormController, ListState};
use crate::entities::CrRecord;
use crate::errors::Result;
use clap::Subcommand;

/// `crs` actions
#[derive(Debug, Clone, Subcommand)]
pub enum CrAction {
    /// List CRs, optionally filtered
    List {
        /// Academic year, e.g. E2
        #[arg(long)]
        year: Option<String>,
        /// Branch, e.g. CSE
        #[arg(long)]
        branch: Option<String>,
        /// Matches id or name, case-insensitive
        #[arg(long)]
        search: Option<String>,
    },
    /// Appoint a student as CR
    Add {
        /// Student id
        #[arg(long)]
        id: String,
        /// 10-digit contact number
        #[arg(long)]
        phone: String,
    },
    /// Remove a CR
    Remove {
        /// Student id of the CR
        id: String,
    },
}

/// Runs one `crs` action.
pub async fn run<T: Transport>(ctx: &AppContext<T>, action: CrAction) -> Result<String> {
    let list: ListState<CrRecord> = ListState::new();
    match action {
        CrAction::List {
            year,
            branch,
            search,
        } => {
            let criteria = criteria_from_flags(
                &ctx.config.filters,
                vec![(Dimension::Year, year), (Dimension::Branch, branch)],
                search,
            )?;
            list.refresh(&ctx.client).await?;
            Ok(render::list(&list.filtered(&criteria).await, &criteria))
        }
        CrAction::Add { id, phone } => {
            let form: FormController<CrDraft> =
                FormController::create().with_numeric_years(ctx.config.api.numeric_years);
            form.update_draft(|draft| {
                draft.id = id;
                draft.phone = phone;
            })
            .await;
            let submission = form.submit(&ctx.client, &list).await?;
            Ok(outcome(submission, |cr| {
                format!(
                    "Added CR {} ({}, {} {})",
                    cr.id, cr.name, cr.year, cr.branch
                )
            }))
        }
        CrAction::Remove { id } => {
            ctx.client.delete::<CrRecord>(&id).await?;
            Ok(format!("Removed CR {id}."))
        }
    }
}
