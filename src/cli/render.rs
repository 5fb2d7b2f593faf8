//! Plain-text rendering of lists and records.

use crate::core::FilterCriteria;
use crate::entities::{CrRecord, FacultyRecord, Record, StudentRecord};

/// One line per record in a list view.
pub trait Row {
    /// Single-line rendering.
    fn row(&self) -> String;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

impl Row for CrRecord {
    fn row(&self) -> String {
        format!(
            "{:<10} {:<24} {:<3} {:<6} {:<2} {}",
            self.id,
            self.name,
            self.year,
            self.branch,
            or_dash(self.section.as_deref()),
            or_dash(self.phone.as_deref()),
        )
    }
}

impl Row for FacultyRecord {
    fn row(&self) -> String {
        format!(
            "#{:<5} {:<8} {:<24} {:<8} {:<6} {:<3} {}",
            self.assignment_id,
            self.id,
            self.name,
            self.subject_code,
            self.department,
            self.year,
            self.section,
        )
    }
}

impl Row for StudentRecord {
    fn row(&self) -> String {
        format!(
            "{:<10} {:<24} {:<3} {:<6} {:<2} {}",
            self.id,
            self.name,
            self.year,
            self.branch,
            or_dash(self.section.as_deref()),
            or_dash(self.email.as_deref()),
        )
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Summary line, e.g. `Showing 3 CRs • 2 filters active`.
#[must_use]
pub fn summary<R: Record>(shown: usize, criteria: &FilterCriteria) -> String {
    let mut line = format!("Showing {}", plural(shown, R::LABEL));
    let active = criteria.active_count();
    if active > 0 {
        line.push_str(&format!(" • {} active", plural(active, "filter")));
    }
    line
}

/// Rows followed by the summary line.
#[must_use]
pub fn list<R: Record + Row>(records: &[R], criteria: &FilterCriteria) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("No matching records.\n");
    }
    for record in records {
        out.push_str(&record.row());
        out.push('\n');
    }
    out.push_str(&summary::<R>(records.len(), criteria));
    out
}
