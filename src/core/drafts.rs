//! Form drafts and their local validation rules.
//!
//! A draft is what the admin has typed so far. It is validated before anything is sent
//! and turned into the request body the backend expects for its resource.

use super::year;
use crate::api::Payload;
use crate::entities::{CrRecord, FacultyRecord, Record, StudentRecord};
use crate::errors::{Error, Result};
use serde_json::json;
use std::fmt::Debug;

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// `POST /<collection>/add`
    Create,
    /// `PUT /<collection>/update/<key>`
    Update {
        /// Key of the record being edited
        key: String,
    },
}

/// Form input for one resource.
pub trait Draft: Clone + Default + Debug + Send + Sync {
    /// Record type the backend returns for this draft
    type Output: Record;

    /// Checks required fields and formats. Runs before any network call.
    fn validate(&self, mode: &FormMode) -> Result<()>;

    /// Request body for `mode`.
    fn payload(&self, mode: &FormMode, numeric_years: bool) -> Result<Payload>;
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "is required"))
    } else {
        Ok(())
    }
}

fn ten_digit_phone(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::validation(field, "must be a 10-digit number"))
    }
}

/// New CR: the backend fills in everything else from the student record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrDraft {
    /// Student id
    pub id: String,
    /// 10-digit contact number
    pub phone: String,
}

impl Draft for CrDraft {
    type Output = CrRecord;

    fn validate(&self, _mode: &FormMode) -> Result<()> {
        required("id", &self.id)?;
        required("phone", &self.phone)?;
        ten_digit_phone("phone", &self.phone)
    }

    fn payload(&self, _mode: &FormMode, _numeric_years: bool) -> Result<Payload> {
        Ok(Payload::form()
            .text("id", self.id.trim())
            .text("mobile", self.phone.trim()))
    }
}

/// Faculty subject assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyDraft {
    /// Backend assignment id; zero until the record exists
    pub assignment_id: i64,
    /// Faculty staff id
    pub id: String,
    /// Faculty name
    pub name: String,
    /// Subject code
    pub subject_code: String,
    /// Department
    pub department: String,
    /// Academic year, display code
    pub year: String,
    /// Section
    pub section: String,
}

impl From<&FacultyRecord> for FacultyDraft {
    fn from(record: &FacultyRecord) -> Self {
        Self {
            assignment_id: record.assignment_id,
            id: record.id.clone(),
            name: record.name.clone(),
            subject_code: record.subject_code.clone(),
            department: record.department.clone(),
            year: record.year.clone(),
            section: record.section.clone(),
        }
    }
}

impl FacultyDraft {
    fn to_json(&self, mode: &FormMode, numeric_years: bool) -> serde_json::Value {
        let mut body = json!({
            "id": self.id.trim(),
            "name": self.name.trim(),
            "subject_code": self.subject_code.trim(),
            "department": self.department,
            "year": year::for_payload(&self.year, numeric_years),
            "section": self.section,
        });
        // New assignments get their id from the backend.
        if let (FormMode::Update { .. }, Some(fields)) = (mode, body.as_object_mut()) {
            fields.insert("assignment_id".to_string(), json!(self.assignment_id));
        }
        body
    }
}

impl Draft for FacultyDraft {
    type Output = FacultyRecord;

    fn validate(&self, mode: &FormMode) -> Result<()> {
        if matches!(mode, FormMode::Update { .. }) && self.assignment_id == 0 {
            return Err(Error::validation("assignment_id", "is required"));
        }
        required("id", &self.id)?;
        required("name", &self.name)?;
        required("subject_code", &self.subject_code)?;
        required("department", &self.department)?;
        required("year", &self.year)?;
        required("section", &self.section)
    }

    fn payload(&self, mode: &FormMode, numeric_years: bool) -> Result<Payload> {
        let body = self.to_json(mode, numeric_years);
        Ok(match mode {
            FormMode::Create => Payload::Json(body),
            // The update endpoint takes the record as a JSON string inside a form.
            FormMode::Update { .. } => {
                Payload::form().text("faculty", serde_json::to_string(&body)?)
            }
        })
    }
}

/// Single student added by hand rather than by spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    /// University id
    pub id: String,
    /// Full name
    pub name: String,
    /// Academic year, display code
    pub year: String,
    /// Branch
    pub branch: String,
    /// Section, optional
    pub section: String,
    /// Contact number, optional
    pub phone: String,
}

impl Draft for StudentDraft {
    type Output = StudentRecord;

    fn validate(&self, _mode: &FormMode) -> Result<()> {
        required("id", &self.id)?;
        required("name", &self.name)?;
        required("year", &self.year)?;
        required("branch", &self.branch)?;
        if self.phone.trim().is_empty() {
            Ok(())
        } else {
            ten_digit_phone("phone", &self.phone)
        }
    }

    fn payload(&self, _mode: &FormMode, numeric_years: bool) -> Result<Payload> {
        let mut payload = Payload::form()
            .text("id", self.id.trim())
            .text("name", self.name.trim())
            .text("year", year::for_payload(&self.year, numeric_years))
            .text("branch", self.branch.as_str());
        if !self.section.trim().is_empty() {
            payload = payload.text("section", self.section.trim());
        }
        if !self.phone.trim().is_empty() {
            payload = payload.text("mobile", self.phone.trim());
        }
        Ok(payload)
    }
}
