//! Application configuration loading from config.toml
//!
//! Every section is optional; a missing file or missing keys fall back to the
//! defaults of the production deployment. A few values can be overridden from the
//! environment (usually via `.env`).

use crate::core::filter::Dimension;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Backend used when neither config.toml nor the environment name one
pub const DEFAULT_BASE_URL: &str = "https://ams-server-4eol.onrender.com";

/// Environment variable naming the config file
pub const CONFIG_PATH_VAR: &str = "AMS_CONFIG";
/// Environment variable overriding `[api].base_url`
pub const BASE_URL_VAR: &str = "AMS_API_BASE_URL";
/// Environment variable overriding `session_path`
pub const SESSION_PATH_VAR: &str = "AMS_SESSION_PATH";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote API settings
    pub api: ApiConfig,
    /// Login policy
    pub auth: AuthConfig,
    /// Option lists backing the filter controls and upload forms
    pub filters: FilterOptions,
    /// Where the logged-in admin identity is kept between runs
    pub session_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            filters: FilterOptions::default(),
            session_path: PathBuf::from(".ams-session.json"),
        }
    }
}

/// `[api]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the attendance backend
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Send "1".."4" instead of "E1".."E4" in outgoing payloads
    pub numeric_years: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            numeric_years: false,
        }
    }
}

impl ApiConfig {
    /// Parses `base_url`, rejecting anything that is not an absolute http(s) URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| Error::Config {
            message: format!("Invalid api.base_url {:?}: {e}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("api.base_url must be http(s), got {:?}", self.base_url),
            });
        }
        Ok(url)
    }
}

/// `[auth]` section
///
/// The allow-list is a convenience gate for the console only. Authorization is the
/// backend's job.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Email domain every admin account must belong to
    pub allowed_domain: String,
    /// Emails allowed to sign in (compared lower-cased)
    pub admin_emails: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: "rguktrkv.ac.in".to_string(),
            admin_emails: vec!["admin@rguktrkv.ac.in".to_string()],
        }
    }
}

/// `[filters]` section - the values offered by each filter control.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterOptions {
    /// Academic years, display codes
    pub years: Vec<String>,
    /// Branches; faculty departments use the same list
    pub branches: Vec<String>,
    /// Class sections
    pub sections: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        let owned = |values: &[&str]| values.iter().map(ToString::to_string).collect();
        Self {
            years: owned(&["E1", "E2", "E3", "E4"]),
            branches: owned(&["CSE", "ECE", "EEE", "CIVIL", "ME", "MME", "CHEM"]),
            sections: owned(&["A", "B", "C", "D", "E"]),
        }
    }
}

impl FilterOptions {
    /// Options for one dimension (without the "All" sentinel).
    #[must_use]
    pub fn for_dimension(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Year => &self.years,
            Dimension::Branch | Dimension::Department => &self.branches,
            Dimension::Section => &self.sections,
        }
    }

    /// Checks that `value` is one of the options for `dimension`.
    pub fn require(&self, dimension: Dimension, value: &str) -> Result<()> {
        if self.for_dimension(dimension).iter().any(|o| o == value) {
            Ok(())
        } else {
            Err(Error::validation(
                dimension.label(),
                format!(
                    "{value:?} is not one of {}",
                    self.for_dimension(dimension).join(", ")
                ),
            ))
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads the application configuration the binary runs with.
///
/// Reads `$AMS_CONFIG` (default `./config.toml`); a missing file is not an error and
/// yields defaults. Environment overrides are applied last and the base URL is
/// validated before returning.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        tracing::info!("No config file at {path}, using defaults.");
        AppConfig::default()
    };

    apply_env_overrides(
        &mut config,
        std::env::var(BASE_URL_VAR).ok(),
        std::env::var(SESSION_PATH_VAR).ok(),
    );
    config.api.parsed_base_url()?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut AppConfig,
    base_url: Option<String>,
    session_path: Option<String>,
) {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!("Base URL overridden from environment: {url}");
        config.api.base_url = url;
    }
    if let Some(path) = session_path.filter(|p| !p.trim().is_empty()) {
        config.session_path = PathBuf::from(path);
    }
}
