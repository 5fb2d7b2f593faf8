//! Console command handlers.
//!
//! Every handler returns the text to print; the binary decides where it goes.

/// `crs` subcommands
pub mod crs;
/// `faculty` subcommands
pub mod faculty;
/// `login`, `logout` and `whoami`
pub mod session;
/// `students` subcommands
pub mod students;
/// `subjects` and `schedules` uploads
pub mod uploads;

use crate::config::FilterOptions;
use crate::core::{ALL, Dimension, FilterCriteria, Submission};
use crate::errors::Result;

/// Builds criteria from command-line filter flags.
///
/// Selections on dimensions without loaded options are dropped; the rest must be
/// one of the configured values.
pub(crate) fn criteria_from_flags(
    options: &FilterOptions,
    selections: Vec<(Dimension, Option<String>)>,
    search: Option<String>,
) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    for (dimension, value) in selections {
        if let Some(value) = value {
            criteria.select(dimension, value);
        }
    }
    criteria.degrade_unloaded(options);

    for dimension in Dimension::EVERY {
        let selected = criteria.selected(dimension);
        if selected != ALL {
            options.require(dimension, selected)?;
        }
    }
    if let Some(text) = search {
        criteria.set_search(text);
    }
    Ok(criteria)
}

/// Message for a form or upload outcome.
pub(crate) fn outcome<T>(submission: Submission<T>, describe: impl FnOnce(&T) -> String) -> String {
    match submission {
        Submission::Applied(value) => describe(&value),
        Submission::Suppressed => "A submission is already in progress.".to_string(),
    }
}
