//! Console layer - command tree and the context every command runs with.
//!
//! Each invocation loads the session, checks the login gate, runs one command against
//! the remote backend and returns the text to print.

/// Command handlers per resource
pub mod commands;
/// Plain-text list rendering
pub mod render;

use crate::api::{HttpTransport, RemoteClient, Transport};
use crate::config::{AppConfig, SessionContext, SessionStore};
use crate::errors::Result;
use clap::{Parser, Subcommand};
use commands::crs::CrAction;
use commands::faculty::FacultyAction;
use commands::session::LoginArgs;
use commands::students::StudentAction;
use commands::uploads::{ScheduleAction, SubjectAction};
use tracing::debug;

/// Admin console for the attendance management system
#[derive(Debug, Parser)]
#[command(name = "ams-admin", version)]
pub struct Cli {
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in as an admin
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Class representatives
    Crs {
        /// Action on CRs
        #[command(subcommand)]
        action: CrAction,
    },
    /// Faculty subject assignments
    Faculty {
        /// Action on faculty assignments
        #[command(subcommand)]
        action: FacultyAction,
    },
    /// Students
    Students {
        /// Action on students
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Subject catalogue
    Subjects {
        /// Action on subjects
        #[command(subcommand)]
        action: SubjectAction,
    },
    /// Class timetables
    Schedules {
        /// Action on schedules
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

/// Shared state available to all commands.
pub struct AppContext<T = HttpTransport> {
    /// Loaded configuration
    pub config: AppConfig,
    /// Client for the attendance backend
    pub client: RemoteClient<T>,
    /// Current admin session, if any
    pub session: SessionContext,
    /// Where the session is persisted
    pub store: SessionStore,
}

impl AppContext<HttpTransport> {
    /// Builds the production context: HTTP transport plus the persisted session.
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Self::with_transport(config, transport).await
    }
}

impl<T: Transport> AppContext<T> {
    /// Builds a context over any transport.
    pub async fn with_transport(config: AppConfig, transport: T) -> Result<Self> {
        let store = SessionStore::new(config.session_path.clone());
        let session = store.load().await?;
        Ok(Self {
            config,
            client: RemoteClient::new(transport),
            session,
            store,
        })
    }
}

/// Runs one command and returns the text to print.
///
/// Everything except `login` requires an active session; the check happens before any
/// request is made.
pub async fn run<T: Transport>(ctx: &mut AppContext<T>, command: Command) -> Result<String> {
    if !matches!(command, Command::Login(_)) {
        let admin = ctx.session.require()?;
        debug!("Running {:?} as {}", command, admin.email);
    }

    match command {
        Command::Login(args) => commands::session::login(ctx, args).await,
        Command::Logout => commands::session::logout(ctx).await,
        Command::Whoami => commands::session::whoami(ctx),
        Command::Crs { action } => commands::crs::run(ctx, action).await,
        Command::Faculty { action } => commands::faculty::run(ctx, action).await,
        Command::Students { action } => commands::students::run(ctx, action).await,
        Command::Subjects { action } => commands::uploads::run_subjects(ctx, action).await,
        Command::Schedules { action } => commands::uploads::run_schedules(ctx, action).await,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{FakeTransport, init_test_tracing, sample_crs, sample_faculty};
    use serde_json::json;
    use tempfile::TempDir;

    async fn context(dir: &TempDir) -> AppContext<FakeTransport> {
        let config = AppConfig {
            session_path: dir.path().join("session.json"),
            ..AppConfig::default()
        };
        AppContext::with_transport(config, FakeTransport::new())
            .await
            .unwrap()
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["ams-admin"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    async fn signed_in(dir: &TempDir) -> AppContext<FakeTransport> {
        let mut ctx = context(dir).await;
        run(&mut ctx, parse(&["login", "--email", "Admin@rguktrkv.ac.in"]))
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_commands_require_session() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir).await;

        let err = run(&mut ctx, parse(&["crs", "list"])).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert_eq!(ctx.client.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_persists_across_contexts() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir).await;
        let greeting = run(&mut ctx, parse(&["login", "--email", "Admin@rguktrkv.ac.in"]))
            .await
            .unwrap();
        assert_eq!(greeting, "Welcome, admin <admin@rguktrkv.ac.in>");

        let mut next = context(&dir).await;
        let who = run(&mut next, parse(&["whoami"])).await.unwrap();
        assert!(who.starts_with("admin <admin@rguktrkv.ac.in> (admin)"));

        run(&mut next, parse(&["logout"])).await.unwrap();
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_foreign_domain_login_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir).await;
        let err = run(&mut ctx, parse(&["login", "--email", "someone@gmail.com"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert!(!ctx.session.is_active());
    }

    #[tokio::test]
    async fn test_crs_list_filters_and_summarizes() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = &mut signed_in(&dir).await;
        ctx.client
            .transport()
            .respond(200, json!({ "crs": sample_crs() }));

        let out = run(ctx, parse(&["crs", "list", "--year", "E1", "--branch", "ECE"]))
            .await
            .unwrap();
        assert!(out.contains("R220101"));
        assert!(!out.contains("R210387"));
        assert!(out.ends_with("Showing 1 CR • 2 filters active"));
    }

    #[tokio::test]
    async fn test_unknown_filter_value_is_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = &mut signed_in(&dir).await;
        let err = run(ctx, parse(&["students", "list", "--branch", "BIO"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "branch"));
        assert_eq!(ctx.client.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_crs_add_invalid_phone_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = &mut signed_in(&dir).await;
        let err = run(ctx, parse(&["crs", "add", "--id", "R210387", "--phone", "12345"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid phone: must be a 10-digit number");
        assert_eq!(ctx.client.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_faculty_update_overrides_one_field() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = &mut signed_in(&dir).await;
        let mut updated = sample_faculty()[1].clone();
        updated.section = "D".to_string();
        let transport = ctx.client.transport();
        transport.respond(200, json!({ "faculties": sample_faculty() }));
        transport.respond(200, json!({ "success": true, "faculty": updated }));

        let out = run(ctx, parse(&["faculty", "update", "2", "--section", "D"]))
            .await
            .unwrap();
        assert_eq!(out, "Updated assignment #2");

        let sent = ctx.client.transport().requests();
        assert_eq!(sent[1].path, "faculties/update/2");
        let body = sent[1].body.as_ref().unwrap();
        let encoded: serde_json::Value =
            serde_json::from_str(body.text_field("faculty").unwrap()).unwrap();
        assert_eq!(encoded["section"], "D");
        assert_eq!(encoded["subject_code"], "EC2201");
    }

    #[tokio::test]
    async fn test_faculty_update_unknown_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = &mut signed_in(&dir).await;
        ctx.client
            .transport()
            .respond(200, json!({ "faculties": sample_faculty() }));
        let err = run(ctx, parse(&["faculty", "update", "99", "--name", "X"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "assignment_id"));
        assert_eq!(ctx.client.transport().call_count(), 1);
    }

    #[tokio::test]
    async fn test_faculty_upload_reloads_list() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("faculty.xlsx");
        std::fs::write(&sheet, b"PK\x03\x04").unwrap();
        let ctx = &mut signed_in(&dir).await;
        let transport = ctx.client.transport();
        transport.respond(200, json!({ "message": "3 assignments imported" }));
        transport.respond(200, json!({ "faculties": sample_faculty() }));

        let out = run(
            ctx,
            Command::Faculty {
                action: FacultyAction::Upload { file: sheet },
            },
        )
        .await
        .unwrap();
        assert_eq!(out, "3 assignments imported\n3 faculty assignments loaded.");
        let paths: Vec<String> = ctx
            .client
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["faculties/upload_faculty", "faculties"]);
    }

    #[tokio::test]
    async fn test_schedule_upload_sends_class_context() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("e3_cse.xlsx");
        std::fs::write(&sheet, b"PK\x03\x04").unwrap();
        let ctx = &mut signed_in(&dir).await;
        ctx.client
            .transport()
            .respond(200, json!({ "message": "Schedule saved" }));

        let sheet_arg = sheet.to_string_lossy().into_owned();
        let out = run(
            ctx,
            parse(&[
                "schedules", "upload", &sheet_arg, "--year", "E3", "--department", "CSE",
                "--replace",
            ]),
        )
        .await
        .unwrap();
        assert_eq!(out, "Schedule saved");
        let sent = ctx.client.transport().requests();
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body.text_field("replace"), Some("true"));
        assert_eq!(body.text_field("department"), Some("CSE"));
    }
}
