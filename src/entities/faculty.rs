//! Faculty assignment record - one faculty member teaching one subject to one class.

use super::{Record, Resource, lenient_string};
use crate::core::{filter::Dimension, year};
use serde::{Deserialize, Serialize};

/// Faculty assignment as returned by `GET /faculties`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    /// Backend id of the assignment; the key within a list
    #[serde(default)]
    pub assignment_id: i64,
    /// Faculty staff id
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Faculty name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Department teaching the subject
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: String,
    /// Subject code, e.g. "CS3101"
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_code: String,
    /// Academic year of the class
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    /// Section of the class
    #[serde(default, deserialize_with = "lenient_string")]
    pub section: String,
}

impl Record for FacultyRecord {
    const RESOURCE: Resource = Resource::Faculties;
    const SINGULAR: &'static str = "faculty";
    const LABEL: &'static str = "faculty assignment";

    fn key(&self) -> String {
        self.assignment_id.to_string()
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Year => Some(self.year.as_str()),
            Dimension::Department => Some(self.department.as_str()),
            Dimension::Section => Some(self.section.as_str()),
            Dimension::Branch => None,
        }
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.id.as_str(), self.subject_code.as_str()]
    }

    fn normalize_year(&mut self) {
        self.year = year::to_display(&self.year);
    }
}
