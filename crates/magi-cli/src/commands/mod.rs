pub mod auth;
pub mod config;
pub mod data;
pub mod exercise;
pub mod goal;
pub mod habit;
pub mod mood;
pub mod reading;
pub mod stats;

/// Split a comma-separated list, dropping empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
