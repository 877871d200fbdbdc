// src/specs/github.rs
//! "Last updated" line: newest commit touching a file of the data repository.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::config::consts::{GITHUB_API, SAO_PAULO_UTC_OFFSET_SECS};
use crate::core::net::{Request, Transport};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct CommitEntry {
    commit: Commit,
}

#[derive(Deserialize)]
struct Commit {
    committer: Signature,
}

#[derive(Deserialize)]
struct Signature {
    date: String,
}

/// Committer date of the newest commit on `path`, as `dd/mm/YYYY HH:MM:SS`
/// in Brasília time. `Ok(None)` when the path has no history.
pub fn last_commit(transport: &dyn Transport, repo: &str, path: &str) -> Result<Option<String>> {
    let req = Request::get(format!("{GITHUB_API}/repos/{repo}/commits"))
        .query("path", path)
        .query("page", 1)
        .query("per_page", 1)
        .accept("application/vnd.github+json");
    let resp = transport.get(&req)?.require_ok(&req)?;
    let entries: Vec<CommitEntry> = resp.json()?;
    let Some(newest) = entries.into_iter().next() else {
        logf!("GitHub: no commits for {repo}:{path}");
        return Ok(None);
    };
    format_brasilia(&newest.commit.committer.date).map(Some)
}

/// Current wall-clock time in Brasília, same rendering as commit dates.
pub fn now_brasilia() -> String {
    let now = chrono::Utc::now();
    match FixedOffset::east_opt(SAO_PAULO_UTC_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).format("%d/%m/%Y %H:%M:%S").to_string(),
        None => now.format("%d/%m/%Y %H:%M:%S").to_string(),
    }
}

pub fn format_brasilia(rfc3339: &str) -> Result<String> {
    let offset = FixedOffset::east_opt(SAO_PAULO_UTC_OFFSET_SECS)
        .ok_or_else(|| Error::Config(s!("invalid UTC offset")))?;
    let at = DateTime::parse_from_rfc3339(rfc3339)
        .map_err(|e| Error::Other(format!("commit date {rfc3339:?}: {e}")))?;
    Ok(at.with_timezone(&offset).format("%d/%m/%Y %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_shifts_to_brasilia() {
        assert_eq!(format_brasilia("2024-06-01T02:15:00Z").unwrap(), "31/05/2024 23:15:00");
        assert!(format_brasilia("ontem").is_err());
    }
}
