//! Download conflict detection.
//!
//! A download overwrites local files, so before transferring anything the
//! orchestrator compares each remote record's timestamp against the local
//! file at the same relative path. A conflict exists only when the local
//! file is strictly newer; absent, equal-aged or older local files (and
//! records whose timestamp cannot be parsed) download without question.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::remote::RemoteSaveRecord;

/// A local file a pending download would overwrite despite being newer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadConflict {
    pub filename: String,
    pub local_modified: String,
    pub remote_modified: String,
}

/// Remote stores report timestamps in RFC 3339, some proxies in RFC 2822.
pub(crate) fn parse_remote_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn local_modified(path: &Path) -> Option<DateTime<Utc>> {
    let meta = std::fs::metadata(path).ok()?;
    let mtime = meta.modified().ok()?;
    let duration = mtime.duration_since(UNIX_EPOCH).ok()?;
    DateTime::from_timestamp(duration.as_secs() as i64, duration.subsec_nanos())
}

/// Compare one game's remote records against the local destination root.
pub fn detect(dest_base: &Path, records: &[RemoteSaveRecord]) -> Vec<DownloadConflict> {
    records
        .iter()
        .filter_map(|record| {
            let local_path = dest_base.join(&record.filename);
            let local_dt = local_modified(&local_path)?;
            let remote_dt = parse_remote_timestamp(&record.last_modified)?;
            (local_dt > remote_dt).then(|| DownloadConflict {
                filename: record.filename.clone(),
                local_modified: local_dt.to_rfc3339(),
                remote_modified: record.last_modified.clone(),
            })
        })
        .collect()
}
