//! Entity module - typed records returned by the attendance backend.
//!
//! Each resource gets its own record type instead of a loose field bag. All of them
//! implement [`Record`], which is what the list state, filter engine and remote client
//! are generic over.

pub mod cr;
pub mod faculty;
pub mod student;

pub use cr::CrRecord;
pub use faculty::FacultyRecord;
pub use student::StudentRecord;

use crate::core::filter::Dimension;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::fmt;

/// Backend collections reachable from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Class representatives
    Crs,
    /// Faculty subject assignments
    Faculties,
    /// Enrolled students
    Students,
    /// Subject catalogue (upload only)
    Subjects,
    /// Department faculty schedules (upload only)
    FacultySchedules,
}

impl Resource {
    /// URL path segment of the collection.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Crs => "crs",
            Self::Faculties => "faculties",
            Self::Students => "students",
            Self::Subjects => "subjects",
            Self::FacultySchedules => "defacultschedules",
        }
    }

    /// Key under which `GET /<collection>` returns its records.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        self.path()
    }

    /// Path of the spreadsheet upload endpoint, if the backend has one.
    #[must_use]
    pub const fn upload_path(self) -> Option<&'static str> {
        match self {
            Self::Crs => None,
            Self::Faculties => Some("faculties/upload_faculty"),
            Self::Students => Some("students/upload"),
            Self::Subjects => Some("subjects/upload"),
            Self::FacultySchedules => Some("defacultschedules/upload"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A record held in a list state and shown in the console.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection this record belongs to
    const RESOURCE: Resource;
    /// Envelope key of the record in write responses
    const SINGULAR: &'static str;
    /// Label used in list summaries ("Showing 3 CRs")
    const LABEL: &'static str;

    /// Unique key within a list state.
    fn key(&self) -> String;

    /// Value of a categorical filter dimension, `None` when the record has no such field.
    fn dimension(&self, dimension: Dimension) -> Option<&str>;

    /// Fields matched by free-text search.
    fn searchable(&self) -> Vec<&str>;

    /// Rewrites server year codes into display codes.
    fn normalize_year(&mut self);
}

/// Accepts a JSON string or number and yields a string.
///
/// Year codes in particular come back as `1` or `"1"` depending on the endpoint.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null => String::new(),
    })
}

/// Optional variant of [`lenient_string`]; empty and null values become `None`.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_string(deserializer)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths_match_backend() {
        assert_eq!(Resource::Crs.path(), "crs");
        assert_eq!(Resource::Faculties.collection_key(), "faculties");
        assert_eq!(Resource::FacultySchedules.path(), "defacultschedules");
        assert_eq!(
            Resource::Faculties.upload_path(),
            Some("faculties/upload_faculty")
        );
        assert_eq!(Resource::Crs.upload_path(), None);
    }
}
