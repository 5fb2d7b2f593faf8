//! Class representative record.
//!
//! A CR is created from just a student id and a phone number; the backend resolves the
//! student's name, year, branch and section and returns them in the created record.

use super::{Record, Resource, lenient_opt_string, lenient_string};
use crate::core::{filter::Dimension, year};
use serde::{Deserialize, Serialize};

/// CR as returned by `GET /crs` and `POST /crs/add`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrRecord {
    /// Student id, unique per CR
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Student name resolved by the backend
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Academic year, display code after normalization
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    /// Branch, e.g. "CSE"
    #[serde(default, deserialize_with = "lenient_string")]
    pub branch: String,
    /// Section letter
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub section: Option<String>,
    /// Contact number; the add endpoint calls this field `mobile`
    #[serde(default, alias = "mobile", deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,
}

impl Record for CrRecord {
    const RESOURCE: Resource = Resource::Crs;
    const SINGULAR: &'static str = "newcr";
    const LABEL: &'static str = "CR";

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
