//! Academic year code translation.
//!
//! The backend stores years as `"1"`..`"4"` while every list and filter in the console
//! uses the display codes `"E1"`..`"E4"`. Both directions are fixed lookups and leave
//! any other value untouched.

const YEAR_CODES: [(&str, &str); 4] = [("1", "E1"), ("2", "E2"), ("3", "E3"), ("4", "E4")];

/// Maps a server year code to its display code, passing unknown values through.
#[must_use]
pub fn to_display(code: &str) -> String {
    YEAR_CODES
        .iter()
        .find(|(server, _)| *server == code)
        .map_or_else(|| code.to_string(), |(_, display)| (*display).to_string())
}

/// Maps a display year code back to the server code, passing unknown values through.
#[must_use]
pub fn to_server(code: &str) -> String {
    YEAR_CODES
        .iter()
        .find(|(_, display)| *display == code)
        .map_or_else(|| code.to_string(), |(server, _)| (*server).to_string())
}

/// Year value to put in an outgoing payload.
///
/// The backend accepts display codes, so translation only happens when the
/// deployment is configured for numeric years.
#[must_use]
pub fn for_payload(code: &str, numeric_years: bool) -> String {
    if numeric_years {
        to_server(code)
    } else {
        code.to_string()
    }
}
