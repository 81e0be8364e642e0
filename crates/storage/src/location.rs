//! Where a database URL points: an in-memory store or a file on disk.

use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/contacts.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

/// Accepts a `sqlite://` URL, the `sqlite:path` shorthand or a bare file path
/// and returns a `sqlite://` URL. Blank input selects the default store; other
/// schemes pass through for the driver to reject.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }
    if raw.contains("://") || is_memory(raw) {
        return raw.to_string();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw);
    format!("sqlite://{}", path.replace('\\', "/"))
}

/// `None` for non-sqlite URLs and for URLs without a path.
pub fn sqlite_location(database_url: &str) -> Option<SqliteLocation> {
    let rest = database_url.strip_prefix("sqlite:")?;
    if is_memory(database_url) {
        return Some(SqliteLocation::Memory);
    }

    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split_once('?').map_or(rest, |(path, _query)| path);
    (!path.is_empty()).then(|| SqliteLocation::File(PathBuf::from(path)))
}

fn is_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}
