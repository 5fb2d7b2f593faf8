//! Bulk spreadsheet uploads.
//!
//! Students, subjects, faculty schedules and faculty assignments are loaded from Excel
//! files that the backend parses. The console only checks that a spreadsheet was
//! chosen and that the class context is complete, then posts it as multipart data.

use super::filter::Dimension;
use super::form::{SingleFlight, Submission};
use super::year;
use crate::api::{Payload, RemoteClient, Transport};
use crate::config::FilterOptions;
use crate::entities::Resource;
use crate::errors::{Error, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Accepted spreadsheet extensions
const EXCEL_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// What a spreadsheet upload loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    /// Students of one class (year + department)
    Students,
    /// The subject catalogue
    Subjects,
    /// Timetable of one class (year + department)
    FacultySchedules,
    /// Faculty subject assignments
    Faculty,
}

impl UploadTarget {
    /// Backend collection receiving the file.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            Self::Students => Resource::Students,
            Self::Subjects => Resource::Subjects,
            Self::FacultySchedules => Resource::FacultySchedules,
            Self::Faculty => Resource::Faculties,
        }
    }

    /// Whether the upload is scoped to a year and department.
    #[must_use]
    pub const fn needs_class(self) -> bool {
        matches!(self, Self::Students | Self::FacultySchedules)
    }

    /// Whether the endpoint understands the `replace` flag.
    #[must_use]
    pub const fn supports_replace(self) -> bool {
        !matches!(self, Self::Faculty)
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Students => "Students",
            Self::Subjects => "Subjects",
            Self::FacultySchedules => "Schedules",
            Self::Faculty => "Faculty",
        })
    }
}

/// A spreadsheet picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetFile {
    /// File name as sent to the server
    pub name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SpreadsheetFile {
    /// Reads a file from disk, keeping only its file name.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Read {} bytes from {:?}", bytes.len(), path);
        Ok(Self { name, bytes })
    }

    fn is_excel(&self) -> bool {
        let lower = self.name.to_lowercase();
        EXCEL_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }
}

/// One upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// What is being uploaded
    pub target: UploadTarget,
    /// The chosen file
    pub file: Option<SpreadsheetFile>,
    /// Replace existing data for the scope instead of adding to it
    pub replace: bool,
    /// Year of the class, for class-scoped uploads
    pub year: Option<String>,
    /// Department of the class, for class-scoped uploads
    pub department: Option<String>,
}

impl UploadRequest {
    /// Empty request for `target`.
    #[must_use]
    pub const fn new(target: UploadTarget) -> Self {
        Self {
            target,
            file: None,
            replace: false,
            year: None,
            department: None,
        }
    }

    /// Sets the file.
    #[must_use]
    pub fn with_file(mut self, file: SpreadsheetFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Sets the replace flag.
    #[must_use]
    pub fn replacing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Scopes the upload to one class.
    #[must_use]
    pub fn for_class(mut self, year: impl Into<String>, department: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self.department = Some(department.into());
        self
    }

    /// Checks the request against the configured option lists.
    pub fn validate(&self, options: &FilterOptions) -> Result<()> {
        let file = self.file.as_ref().ok_or_else(|| {
            Error::validation("file", format!("please select a {} file first", self.target))
        })?;
        if !file.is_excel() {
            return Err(Error::validation(
                "file",
                "please select an Excel file (.xlsx or .xls)",
            ));
        }
        if file.bytes.is_empty() {
            return Err(Error::validation("file", "file is empty"));
        }

        if self.target.needs_class() {
            let year = self
                .year
                .as_deref()
                .ok_or_else(|| Error::validation("year", "is required"))?;
            options.require(Dimension::Year, year)?;
            let department = self
                .department
                .as_deref()
                .ok_or_else(|| Error::validation("department", "is required"))?;
            options.require(Dimension::Department, department)?;
        }
        Ok(())
    }

    /// Multipart body for the upload endpoint. Call [`UploadRequest::validate`] first.
    pub fn payload(&self, numeric_years: bool) -> Result<Payload> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| Error::validation("file", "is required"))?;
        let mut payload = Payload::form().file("file", file.name.clone(), file.bytes.clone());

        if self.target.needs_class() {
            if let (Some(year), Some(department)) = (&self.year, &self.department) {
                payload = payload
                    .text("year", year::for_payload(year, numeric_years))
                    .text("department", department.as_str());
            }
        }
        if self.target.supports_replace() {
            payload = payload.text("replace", self.replace.to_string());
        }
        Ok(payload)
    }
}

/// Upload control with the same single-flight rule as forms.
#[derive(Debug, Default)]
pub struct Uploader {
    flight: SingleFlight,
    numeric_years: bool,
}

impl Uploader {
    /// New uploader.
    #[must_use]
    pub fn new(numeric_years: bool) -> Self {
        Self {
            flight: SingleFlight::default(),
            numeric_years,
        }
    }

    /// Whether an upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.flight.is_busy()
    }

    /// Validates and posts `request`, returning the server's summary message.
    pub async fn upload<T: Transport>(
        &self,
        client: &RemoteClient<T>,
        request: &UploadRequest,
        options: &FilterOptions,
    ) -> Result<Submission<String>> {
        let Some(_guard) = self.flight.try_begin() else {
            debug!("Upload suppressed: {} upload already in flight", request.target);
            return Ok(Submission::Suppressed);
        };

        request.validate(options)?;
        let payload = request.payload(self.numeric_years)?;
        let message = client.upload(request.target.resource(), payload).await?;
        info!("{} upload finished: {}", request.target, message);
        Ok(Submission::Applied(message))
    }
}
