//! Student record.

use super::{Record, Resource, lenient_opt_string, lenient_string};
use crate::core::{filter::Dimension, year};
use serde::{Deserialize, Serialize};

/// Student as returned by `GET /students`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// University id, unique per student
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Full name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Academic year
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    /// Branch, e.g. "EEE"
    #[serde(default, deserialize_with = "lenient_string")]
    pub branch: String,
    /// Section letter
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub section: Option<String>,
    /// Contact number
    #[serde(default, alias = "mobile", deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,
    /// College email
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub email: Option<String>,
}

impl Record for StudentRecord {
    const RESOURCE: Resource = Resource::Students;
    const SINGULAR: &'static str = "student";
    const LABEL: &'static str = "student";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Year => Some(self.year.as_str()),
            Dimension::Branch => Some(self.branch.as_str()),
            Dimension::Section => self.section.as_deref(),
            Dimension::Department => None,
        }
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str()]
    }

    fn normalize_year(&mut self) {
        self.year = year::to_display(&self.year);
    }
}
