//! Per-game local footprint and freshness summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::UNIX_EPOCH;

use crate::inventory;

/// Size on disk and last-modified times for one configured game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub game_id: String,
    pub local_size_bytes: u64,
    pub local_last_modified: Option<String>,
    pub remote_last_modified: Option<String>,
}

/// Total byte size and newest modification time across a game's paths.
/// Unreadable files simply do not contribute.
pub fn local_stats(paths: &[String]) -> (u64, Option<DateTime<Utc>>) {
    let mut total_size = 0u64;
    let mut newest: Option<DateTime<Utc>> = None;

    for file in inventory::list_all_files(paths) {
        let Ok(meta) = std::fs::metadata(&file.absolute) else {
            continue;
        };
        total_size += meta.len();
        let mtime = meta
            .modified()
            .ok()
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| DateTime::from_timestamp(d.as_secs() as i64, d.subsec_nanos()));
        if let Some(mtime) = mtime {
            newest = Some(match newest {
                Some(prev) if prev > mtime => prev,
                _ => mtime,
            });
        }
    }

    (total_size, newest)
}
