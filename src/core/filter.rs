//! Filter engine - derives the visible slice of a list state.
//!
//! Criteria are a set of categorical selections plus a free-text search. Selections are
//! conjunctive; the sentinel [`ALL`] means a dimension places no constraint. Filtering
//! never mutates its input and keeps the input order.

use crate::config::FilterOptions;
use crate::entities::Record;
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel selection meaning "no constraint on this dimension".
pub const ALL: &str = "All";

/// A categorical filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Academic year, display code ("E1".."E4")
    Year,
    /// Student branch
    Branch,
    /// Faculty department
    Department,
    /// Class section
    Section,
}

impl Dimension {
    /// Every dimension, in display order.
    pub const EVERY: [Self; 4] = [Self::Year, Self::Branch, Self::Department, Self::Section];

    /// Human-readable name of the dimension.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Branch => "branch",
            Self::Department => "department",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active selections and search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    selections: BTreeMap<Dimension, String>,
    search: String,
}

impl FilterCriteria {
    /// Criteria with every dimension at [`ALL`] and no search text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterCriteria::select`].
    #[must_use]
    pub fn with(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.select(dimension, value);
        self
    }

    /// Builder form of [`FilterCriteria::set_search`].
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.set_search(text);
        self
    }

    /// Selects a value for a dimension. Selecting [`ALL`] removes the constraint.
    pub fn select(&mut self, dimension: Dimension, value: impl Into<String>) {
        let value = value.into();
        if value == ALL {
            self.selections.remove(&dimension);
        } else {
            self.selections.insert(dimension, value);
        }
    }

    /// Replaces the search text. Stored as typed; trimmed when matching.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Current selection for a dimension, [`ALL`] when unconstrained.
    #[must_use]
    pub fn selected(&self, dimension: Dimension) -> &str {
        self.selections.get(&dimension).map_or(ALL, String::as_str)
    }

    /// Raw search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Resets every dimension to [`ALL`] and clears the search.
    pub fn clear(&mut self) {
        self.selections.clear();
        self.search.clear();
    }

    /// Number of constrained dimensions, plus one for a non-blank search.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.selections.len() + usize::from(!self.search.trim().is_empty())
    }

    /// True when the criteria admit every record.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.active_count() == 0
    }

    /// Drops selections on dimensions whose option list has not been loaded.
    ///
    /// A missing option list must not block the view, so the dimension falls back to
    /// [`ALL`] instead.
    pub fn degrade_unloaded(&mut self, options: &FilterOptions) {
        self.selections.retain(|dimension, value| {
            let loaded = !options.for_dimension(*dimension).is_empty();
            if !loaded {
                tracing::warn!(
                    "No {} options loaded; ignoring selection {:?}",
                    dimension,
                    value
                );
            }
            loaded
        });
    }

    /// Whether a single record satisfies every active predicate.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let selections_match = self
            .selections
            .iter()
            .all(|(dimension, wanted)| record.dimension(*dimension) == Some(wanted.as_str()));
        if !selections_match {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || record
                .searchable()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Returns the records matching `criteria`, in their original order.
pub fn apply<R: Record>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    records
        .iter()
        .filter(|record| criteria.matches(*record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::year;
    use crate::entities::{CrRecord, FacultyRecord, StudentRecord};
    use crate::test_utils::{sample_crs, sample_faculty, student};

    fn keys<R: Record>(records: &[R]) -> Vec<String> {
        records.iter().map(Record::key).collect()
    }

    fn is_subsequence<R: Record>(sub: &[R], full: &[R]) -> bool {
        let mut remaining = full.iter().map(Record::key);
        sub.iter()
            .all(|r| remaining.by_ref().any(|key| key == r.key()))
    }

    fn criteria_grid() -> Vec<FilterCriteria> {
        let mut grid = vec![FilterCriteria::new()];
        for year in [ALL, "E1", "E2", "E9"] {
            for branch in [ALL, "CSE", "ECE"] {
                for search in ["", "  ", "ra", "R21", "zzz"] {
                    grid.push(
                        FilterCriteria::new()
                            .with(Dimension::Year, year)
                            .with(Dimension::Branch, branch)
                            .with_search(search),
                    );
                }
            }
        }
        grid
    }

    #[test]
    fn test_identity_when_unconstrained() {
        let crs = sample_crs();
        let criteria = FilterCriteria::new()
            .with(Dimension::Year, ALL)
            .with(Dimension::Branch, ALL)
            .with_search("   ");
        assert!(criteria.is_identity());
        assert_eq!(apply(&crs, &criteria), crs);
    }

    #[test]
    fn test_empty_list_yields_empty() {
        let empty: Vec<CrRecord> = Vec::new();
        let criteria = FilterCriteria::new().with(Dimension::Year, "E1");
        assert!(apply(&empty, &criteria).is_empty());
    }

    #[test]
    fn test_output_is_ordered_subsequence_and_idempotent() {
        let crs = sample_crs();
        for criteria in criteria_grid() {
            let once = apply(&crs, &criteria);
            assert!(is_subsequence(&once, &crs), "{criteria:?}");
            assert_eq!(apply(&once, &criteria), once, "{criteria:?}");
        }
    }

    #[test]
    fn test_sound_and_complete() {
        let crs = sample_crs();
        for criteria in criteria_grid() {
            let kept = keys(&apply(&crs, &criteria));
            for cr in &crs {
                assert_eq!(
                    kept.contains(&cr.id),
                    criteria.matches(cr),
                    "record {} under {criteria:?}",
                    cr.id
                );
            }
        }
    }

    #[test]
    fn test_year_scenario_after_mapping() {
        let mut students = vec![
            student("S1", "1", "CSE"),
            student("S2", "2", "ECE"),
        ];
        for s in &mut students {
            s.normalize_year();
        }
        let criteria = FilterCriteria::new()
            .with(Dimension::Year, year::to_display("1"))
            .with(Dimension::Branch, ALL);

        let result: Vec<StudentRecord> = apply(&students, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "S1");
        assert_eq!(result[0].year, "E1");
        assert_eq!(result[0].branch, "CSE");
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        let crs = sample_crs();
        let criteria = FilterCriteria::new().with_search("  aSHa ");
        assert_eq!(keys(&apply(&crs, &criteria)), vec!["R210387"]);
    }

    #[test]
    fn test_faculty_search_covers_subject_code() {
        let faculty = sample_faculty();
        let criteria = FilterCriteria::new().with_search("ec22");
        let result: Vec<FacultyRecord> = apply(&faculty, &criteria);
        assert_eq!(keys(&result), vec!["2"]);
    }

    #[test]
    fn test_missing_dimension_never_matches_constraint() {
        let crs = sample_crs();
        let criteria = FilterCriteria::new().with(Dimension::Department, "CSE");
        assert!(apply(&crs, &criteria).is_empty());
    }

    #[test]
    fn test_unknown_value_matches_nothing() {
        let faculty = sample_faculty();
        let criteria = FilterCriteria::new().with(Dimension::Section, "Z");
        assert!(apply(&faculty, &criteria).is_empty());
    }

    #[test]
    fn test_active_count_and_clear() {
        let mut criteria = FilterCriteria::new()
            .with(Dimension::Year, "E2")
            .with(Dimension::Branch, "ECE")
            .with_search("x");
        assert_eq!(criteria.active_count(), 3);
        criteria.select(Dimension::Branch, ALL);
        assert_eq!(criteria.active_count(), 2);
        assert_eq!(criteria.selected(Dimension::Branch), ALL);
        criteria.clear();
        assert!(criteria.is_identity());
        assert_eq!(criteria.search(), "");
    }

    #[test]
    fn test_degrade_unloaded_falls_back_to_all() {
        let mut options = FilterOptions::default();
        options.sections.clear();
        let mut criteria = FilterCriteria::new()
            .with(Dimension::Year, "E1")
            .with(Dimension::Section, "A");
        criteria.degrade_unloaded(&options);
        assert_eq!(criteria.selected(Dimension::Year), "E1");
        assert_eq!(criteria.selected(Dimension::Section), ALL);
    }
}
