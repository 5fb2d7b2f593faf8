/// Application settings loaded from config.toml and the environment
pub mod app;

/// Admin session context and its on-disk store
pub mod session;

pub use app::{ApiConfig, AppConfig, AuthConfig, FilterOptions, load_app_configuration, load_config};
pub use session::{Identity, Session, SessionContext, SessionStore};
