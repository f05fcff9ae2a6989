//! Sync orchestration: per-game and all-games upload/download.
//!
//! Every file is an independent unit of work. One file's failure is folded
//! into the outcome and never aborts sibling transfers; one game's failure
//! never aborts sibling games in a batch. Downloads are gated by the
//! conflict detector: with unconfirmed conflicts nothing is transferred and
//! the conflict list is surfaced instead of an outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfiguredGame};
use crate::conflict::{self, parse_remote_timestamp, DownloadConflict};
use crate::error::{Result, SyncError};
use crate::inventory::{self, LocalFileRef};
use crate::paths::{absolutize, expand_path};
use crate::remote::{RemoteSaveDirectory, RemoteSaveRecord};
use crate::stats::{self, GameStats};

/// Aggregated success/failure record of one batch transfer.
///
/// `ok_count + err_count` equals the number of files attempted and
/// `errors.len() <= err_count` always holds. Both counts zero means
/// nothing was there to sync, which callers must not read as success.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub ok_count: u32,
    pub err_count: u32,
    pub errors: Vec<String>,
}

impl SyncOutcome {
    pub fn record_ok(&mut self) {
        self.ok_count += 1;
    }

    pub fn record_err(&mut self, message: String) {
        self.err_count += 1;
        self.errors.push(message);
    }

    /// Fold another outcome in: counts sum, error lists concatenate.
    pub fn merge(&mut self, other: SyncOutcome) {
        self.ok_count += other.ok_count;
        self.err_count += other.err_count;
        self.errors.extend(other.errors);
    }

    pub fn total(&self) -> u32 {
        self.ok_count + self.err_count
    }

    /// Zero files attempted. Distinguishes "nothing to sync" from a
    /// successful transfer of zero failures.
    pub fn is_empty(&self) -> bool {
        self.ok_count == 0 && self.err_count == 0
    }
}

/// Terminal state of a download run.
#[derive(Debug)]
pub enum DownloadStatus {
    /// Transfers ran to completion, possibly with per-file failures.
    Completed(SyncOutcome),
    /// Conflicts found and not confirmed; nothing was transferred.
    ConflictsPending(Vec<DownloadConflict>),
}

/// Drives uploads and downloads for the configured games against a remote
/// save directory.
pub struct SyncOrchestrator<'a> {
    config: &'a Config,
    remote: &'a dyn RemoteSaveDirectory,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(config: &'a Config, remote: &'a dyn RemoteSaveDirectory) -> Self {
        Self { config, remote }
    }

    fn game(&self, game_id: &str) -> Result<&'a ConfiguredGame> {
        self.config
            .game(game_id)
            .ok_or_else(|| SyncError::GameNotFound(game_id.to_string()))
    }

    /// The first configured path is the destination root for downloads and
    /// the comparison root for conflicts.
    fn dest_base(game: &ConfiguredGame) -> Result<PathBuf> {
        let raw = game.paths.first().ok_or_else(|| {
            SyncError::Configuration(format!("{} has no configured paths", game.id))
        })?;
        let expanded = expand_path(raw).ok_or_else(|| {
            SyncError::Configuration(format!("cannot expand destination path: {}", raw))
        })?;
        Ok(absolutize(&expanded))
    }

    fn remote_records_for(&self, game_id: &str) -> Result<Vec<RemoteSaveRecord>> {
        Ok(self
            .remote
            .list_saves()?
            .into_iter()
            .filter(|r| r.game_id.eq_ignore_ascii_case(game_id))
            .collect())
    }

    /// Upload every local file of one game. Files are attempted in
    /// enumeration order and independently of each other.
    pub fn upload(&self, game_id: &str) -> Result<SyncOutcome> {
        let game = self.game(game_id)?;
        let files = inventory::list_all_files(&game.paths);
        let mut outcome = SyncOutcome::default();
        if files.is_empty() {
            tracing::info!("{}: no local files to upload", game.id);
            return Ok(outcome);
        }

        tracing::info!("{}: uploading {} file(s)", game.id, files.len());
        for file in &files {
            match self.upload_one(&game.id, file) {
                Ok(()) => outcome.record_ok(),
                Err(e) => outcome.record_err(format!("{}: {}", file.relative, e)),
            }
        }
        Ok(outcome)
    }

    fn upload_one(&self, game_id: &str, file: &LocalFileRef) -> Result<()> {
        let target = self.remote.issue_upload_target(game_id, &file.relative)?;
        let bytes = std::fs::read(&file.absolute)?;
        self.remote.put_bytes(&target.url, bytes)
    }

    /// Conflicts a download of this game would run into right now.
    pub fn check_conflicts(&self, game_id: &str) -> Result<Vec<DownloadConflict>> {
        let game = self.game(game_id)?;
        let dest = Self::dest_base(game)?;
        let records = self.remote_records_for(&game.id)?;
        Ok(conflict::detect(&dest, &records))
    }

    /// Download every remote file of one game into the destination root.
    /// Without `confirmed`, pending conflicts stop the run before any
    /// transfer happens.
    pub fn download(&self, game_id: &str, confirmed: bool) -> Result<DownloadStatus> {
        let game = self.game(game_id)?;
        let dest = Self::dest_base(game)?;
        let records = self.remote_records_for(&game.id)?;

        if !confirmed {
            let conflicts = conflict::detect(&dest, &records);
            if !conflicts.is_empty() {
                return Ok(DownloadStatus::ConflictsPending(conflicts));
            }
        }

        let mut outcome = SyncOutcome::default();
        if records.is_empty() {
            tracing::info!("{}: no remote files to download", game.id);
            return Ok(DownloadStatus::Completed(outcome));
        }

        tracing::info!("{}: downloading {} file(s)", game.id, records.len());
        for record in &records {
            match self.download_one(&game.id, record, &dest) {
                Ok(()) => outcome.record_ok(),
                Err(e) => outcome.record_err(format!("{}: {}", record.filename, e)),
            }
        }
        Ok(DownloadStatus::Completed(outcome))
    }

    fn download_one(
        &self,
        game_id: &str,
        record: &RemoteSaveRecord,
        dest: &Path,
    ) -> Result<()> {
        let source = self.remote.issue_download_source(game_id, &record.key)?;
        let bytes = self.remote.fetch_bytes(&source.url)?;
        let dest_path = dest.join(&record.filename);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest_path, bytes)?;
        Ok(())
    }

    /// Upload all configured games in config order. A game's total failure
    /// becomes one error entry and the batch continues.
    pub fn upload_all(&self) -> SyncOutcome {
        let mut merged = SyncOutcome::default();
        for game in &self.config.games {
            match self.upload(&game.id) {
                Ok(outcome) => merged.merge(outcome),
                Err(e) => merged.record_err(format!("{}: {}", game.id, e)),
            }
        }
        merged
    }

    /// Conflicts across all games. Fail-open per game: when one game's
    /// check errors out it contributes no conflicts, while the transfer
    /// step itself stays fail-closed per file.
    pub fn check_all_conflicts(&self) -> Vec<DownloadConflict> {
        self.config
            .games
            .iter()
            .flat_map(|game| match self.check_conflicts(&game.id) {
                Ok(conflicts) => conflicts,
                Err(e) => {
                    tracing::warn!("{}: conflict check failed: {}", game.id, e);
                    Vec::new()
                }
            })
            .collect()
    }

    /// Download all configured games. Without `confirmed`, any conflict
    /// across any game stops the whole batch before transfers start.
    pub fn download_all(&self, confirmed: bool) -> DownloadStatus {
        if !confirmed {
            let conflicts = self.check_all_conflicts();
            if !conflicts.is_empty() {
                return DownloadStatus::ConflictsPending(conflicts);
            }
        }

        let mut merged = SyncOutcome::default();
        for game in &self.config.games {
            match self.download(&game.id, true) {
                Ok(DownloadStatus::Completed(outcome)) => merged.merge(outcome),
                // download() never returns this variant when confirmed.
                Ok(DownloadStatus::ConflictsPending(_)) => {}
                Err(e) => merged.record_err(format!("{}: {}", game.id, e)),
            }
        }
        DownloadStatus::Completed(merged)
    }

    /// Local footprint plus newest remote timestamp per game. A remote
    /// listing failure degrades the summary to local-only.
    pub fn game_stats(&self) -> Vec<GameStats> {
        let mut remote_newest: HashMap<String, DateTime<Utc>> = HashMap::new();
        if let Ok(records) = self.remote.list_saves() {
            for record in records {
                let Some(dt) = parse_remote_timestamp(&record.last_modified) else {
                    continue;
                };
                let entry = remote_newest
                    .entry(record.game_id.to_lowercase())
                    .or_insert(dt);
                if dt > *entry {
                    *entry = dt;
                }
            }
        }

        self.config
            .games
            .iter()
            .map(|game| {
                let (size, newest) = stats::local_stats(&game.paths);
                GameStats {
                    game_id: game.id.clone(),
                    local_size_bytes: size,
                    local_last_modified: newest.map(|dt| dt.to_rfc3339()),
                    remote_last_modified: remote_newest
                        .get(&game.id.to_lowercase())
                        .map(|dt| dt.to_rfc3339()),
                }
            })
            .collect()
    }
}
