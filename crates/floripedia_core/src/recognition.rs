//! crates/floripedia_core/src/recognition.rs
//!
//! Recovers a recognized plant name from a failed image-search response.
//!
//! The server may identify a plant and still fail to produce its record; when it
//! does, the name only shows up somewhere in the error body. Extraction is
//! best-effort text matching with no guarantee of a match.

use regex::Regex;

lazy_static::lazy_static! {
    static ref SINGLE_QUOTED: Regex =
        Regex::new(r"'name':\s*'([^']+)'").expect("single-quoted name pattern");
    static ref DOUBLE_QUOTED: Regex =
        Regex::new(r#""name":\s*"([^"]+)""#).expect("double-quoted name pattern");
}

/// Returns the first `name` found in `body`, trying `'name': '...'` before
/// `"name": "..."`.
pub fn extract_recognized_name(body: &str) -> Option<String> {
    [&*SINGLE_QUOTED, &*DOUBLE_QUOTED]
        .iter()
        .find_map(|regex| first_capture(regex, body))
}

fn first_capture(regex: &Regex, body: &str) -> Option<String> {
    regex
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
