//! Admin session context.
//!
//! The session is an explicit value handed to whatever needs the login gate. It is set
//! on a successful sign-in, cleared on sign-out, and persisted between console runs by
//! [`SessionStore`]. Nothing here is a security boundary; the backend authorizes
//! requests on its own.

use super::AuthConfig;
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Identity obtained from the external OAuth provider.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// Account email as reported by the provider
    pub email: String,
    /// Display name, if the provider returned one
    pub name: Option<String>,
    /// Avatar URL
    pub picture: Option<String>,
}

/// A signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Display name
    pub name: String,
    /// Lower-cased email
    pub email: String,
    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,
    /// Always "admin" for console sessions
    pub role: String,
    /// When the sign-in happened
    pub login_time: DateTime<Utc>,
}

/// Holds the current session, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    /// Context with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context restored from a previously saved session.
    #[must_use]
    pub const fn restored(session: Option<Session>) -> Self {
        Self { current: session }
    }

    /// Verifies `identity` against `policy` and makes it the current session.
    ///
    /// The email must belong to the configured domain and appear on the admin
    /// allow-list (both compared case-insensitively).
    pub fn sign_in(&mut self, identity: Identity, policy: &AuthConfig) -> Result<&Session> {
        let email = identity.email.trim().to_lowercase();
        let domain_suffix = format!("@{}", policy.allowed_domain.to_lowercase());
        if !email.ends_with(&domain_suffix) {
            warn!("Sign-in refused for {email}: wrong domain");
            return Err(Error::Unauthorized {
                reason: format!("please use your {} email", policy.allowed_domain),
            });
        }
        if !policy
            .admin_emails
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(&email))
        {
            warn!("Sign-in refused for {email}: not on the admin list");
            return Err(Error::Unauthorized {
                reason: "this email is not authorized for admin access".to_string(),
            });
        }

        let name = identity
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        info!("Admin {email} signed in");
        Ok(self.current.insert(Session {
            name,
            email,
            picture: identity.picture,
            role: "admin".to_string(),
            login_time: Utc::now(),
        }))
    }

    /// Clears the current session.
    pub fn sign_out(&mut self) -> Option<Session> {
        self.current.take()
    }

    /// Whether an authorized session is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// The current session.
    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The current session, or `Unauthorized` when nobody is signed in.
    pub fn require(&self) -> Result<&Session> {
        self.current.as_ref().ok_or_else(|| Error::Unauthorized {
            reason: "no active admin session; run `login` first".to_string(),
        })
    }
}

/// File-backed persistence for the session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved session.
    ///
    /// A missing file means nobody is signed in. A file that does not parse is
    /// removed and also treated as signed out.
    pub async fn load(&self) -> Result<SessionContext> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionContext::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(SessionContext::restored(Some(session))),
            Err(e) => {
                warn!("Discarding invalid session file {:?}: {}", self.path, e);
                tokio::fs::remove_file(&self.path).await?;
                Ok(SessionContext::new())
            }
        }
    }

    /// Writes the context: the session when one is active, otherwise removes the file.
    pub async fn save(&self, context: &SessionContext) -> Result<()> {
        match context.current() {
            Some(session) => {
                let json = serde_json::to_string_pretty(session)?;
                tokio::fs::write(&self.path, json).await?;
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn policy() -> AuthConfig {
        AuthConfig {
            allowed_domain: "rguktrkv.ac.in".to_string(),
            admin_emails: vec!["admin@rguktrkv.ac.in".to_string()],
        }
    }

    fn identity(email: &str) -> Identity {
        Identity {
            email: email.to_string(),
            ..Identity::default()
        }
    }

    #[test]
    fn test_sign_in_normalizes_email_and_defaults_name() {
        let mut ctx = SessionContext::new();
        let session = ctx.sign_in(identity("Admin@RGUKTRKV.ac.in"), &policy()).unwrap();
        assert_eq!(session.email, "admin@rguktrkv.ac.in");
        assert_eq!(session.name, "admin");
        assert_eq!(session.role, "admin");
        assert!(ctx.is_active());
    }

    #[test]
    fn test_sign_in_rejects_foreign_domain() {
        let mut ctx = SessionContext::new();
        let err = ctx.sign_in(identity("admin@gmail.com"), &policy()).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_sign_in_rejects_unlisted_email() {
        let mut ctx = SessionContext::new();
        let err = ctx
            .sign_in(identity("r200001@rguktrkv.ac.in"), &policy())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn test_sign_out_clears_gate() {
        let mut ctx = SessionContext::new();
        ctx.sign_in(identity("admin@rguktrkv.ac.in"), &policy()).unwrap();
        assert!(ctx.sign_out().is_some());
        assert!(!ctx.is_active());
        assert!(matches!(ctx.require(), Err(Error::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_store_round_trip_and_logout() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(!store.load().await.unwrap().is_active());

        let mut ctx = SessionContext::new();
        let signed_in = ctx
            .sign_in(
                Identity {
                    email: "admin@rguktrkv.ac.in".to_string(),
                    name: Some("Registrar".to_string()),
                    picture: None,
                },
                &policy(),
            )
            .unwrap()
            .clone();
        store.save(&ctx).await.unwrap();
        assert_eq!(store.load().await.unwrap().current(), Some(&signed_in));

        ctx.sign_out();
        store.save(&ctx).await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::new(&path);
        assert!(!store.load().await.unwrap().is_active());
        assert!(!path.exists());
    }
}
