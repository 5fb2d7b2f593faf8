//! Console logic independent of any front end.
//!
//! Everything here works on typed records and a [`crate::api::RemoteClient`]; the CLI
//! is one thin caller of it.

pub mod drafts;
pub mod filter;
pub mod form;
pub mod list_state;
pub mod upload;
pub mod year;

pub use drafts::{CrDraft, Draft, FacultyDraft, FormMode, StudentDraft};
pub use filter::{ALL, Dimension, FilterCriteria};
pub use form::{FormController, SingleFlight, Submission};
pub use list_state::ListState;
pub use upload::{SpreadsheetFile, UploadRequest, UploadTarget, Uploader};
