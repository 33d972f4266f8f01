//! Acquisition id extraction

use super::date::is_date;
use super::{filename, remove_extension};

/// Returns the acquisition id of `path`, or an empty string
///
/// The id is made of the underscore-delimited segments right after the first
/// date stamp of the filename, concatenated and lower-cased, up to the first
/// purely alphabetic segment.
pub fn extract_id(path: &str) -> String {
    let stem = remove_extension(filename(path));
    let mut segments = stem.split('_');

    if !segments.by_ref().any(is_date) {
        return String::new();
    }

    segments
        .take_while(|segment| !is_alphabetic(segment))
        .map(str::to_lowercase)
        .collect()
}

fn is_alphabetic(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(char::is_alphabetic)
}
