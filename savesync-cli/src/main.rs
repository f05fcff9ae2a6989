//! SaveSync CLI - discover and sync game saves
//!
//! Usage:
//!   savesync scan [--path <dir>...] [--no-resolve]
//!   savesync list
//!   savesync add <game-id> <path>
//!   savesync remove <game-id> [path]
//!   savesync scan-root <add|remove> <path>
//!   savesync upload [game-id]
//!   savesync download [game-id] [--force]
//!   savesync conflicts <game-id>
//!   savesync stats
//!   savesync config

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use savesync_core::{
    Config, ConfigStore, DownloadConflict, DownloadStatus, FolderScanner, HttpRemoteDirectory,
    SyncOrchestrator, SyncOutcome, TitleResolver,
};
use tracing_subscriber::EnvFilter;

/// Errors shown per outcome before collapsing into a summary line.
const MAX_SHOWN_ERRORS: usize = 5;

#[derive(Parser)]
#[command(name = "savesync")]
#[command(about = "SaveSync - sync game saves with the cloud", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan well-known locations for save-folder candidates
    Scan {
        /// Extra root directories to scan
        #[arg(long = "path")]
        paths: Vec<String>,

        /// Skip resolving numeric app ids to game titles
        #[arg(long)]
        no_resolve: bool,
    },

    /// List configured games
    List,

    /// Add a game path to the config (folder or single file)
    Add {
        /// Stable game identifier, e.g. elden-ring
        game_id: String,

        /// Save path, may contain %VAR% or ~
        path: String,
    },

    /// Remove a game, or a single path of a game
    Remove {
        game_id: String,

        /// Only remove this path; the game stays while paths remain
        path: Option<String>,
    },

    /// Manage extra scan roots stored in the config
    ScanRoot {
        #[command(subcommand)]
        action: ScanRootAction,
    },

    /// Upload saves for one game, or for every configured game
    Upload {
        game_id: Option<String>,
    },

    /// Download saves for one game, or for every configured game
    Download {
        game_id: Option<String>,

        /// Overwrite local files even when they are newer than the cloud
        #[arg(long)]
        force: bool,
    },

    /// Show files a download would overwrite despite being newer locally
    Conflicts {
        game_id: String,
    },

    /// Per-game size and freshness summary
    Stats,

    /// Print the config file location
    Config,
}

#[derive(Subcommand)]
enum ScanRootAction {
    /// Add a root directory to every future scan
    Add { path: String },
    /// Remove a previously added root
    Remove { path: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let store = ConfigStore::new().context("Failed to locate the config directory")?;

    match cli.command {
        Commands::Scan { paths, no_resolve } => cmd_scan(&store, paths, !no_resolve),
        Commands::List => cmd_list(&store),
        Commands::Add { game_id, path } => cmd_add(&store, &game_id, &path),
        Commands::Remove { game_id, path } => cmd_remove(&store, &game_id, path.as_deref()),
        Commands::ScanRoot { action } => cmd_scan_root(&store, action),
        Commands::Upload { game_id } => cmd_upload(&store, game_id.as_deref()),
        Commands::Download { game_id, force } => cmd_download(&store, game_id.as_deref(), force),
        Commands::Conflicts { game_id } => cmd_conflicts(&store, &game_id),
        Commands::Stats => cmd_stats(&store),
        Commands::Config => cmd_config(&store),
    }
}

fn remote_for(config: &Config) -> Result<HttpRemoteDirectory> {
    let (base_url, owner_id, api_key) = config
        .require_sync_settings()
        .context("Set apiBaseUrl and ownerId in the config first (see `savesync config`)")?;
    Ok(HttpRemoteDirectory::new(&base_url, &owner_id, &api_key))
}

fn cmd_scan(store: &ConfigStore, extra_paths: Vec<String>, resolve: bool) -> Result<()> {
    let config = store.load();
    let mut roots = config.extra_scan_roots.clone();
    roots.extend(extra_paths);

    let scanner = FolderScanner::new().with_extra_roots(roots);
    let candidates = if resolve {
        scanner.scan_with_titles(&TitleResolver::new())
    } else {
        scanner.scan()
    };

    if candidates.is_empty() {
        println!("No candidate folders found.");
        return Ok(());
    }

    let mut current_base = "";
    for candidate in &candidates {
        if candidate.base_path != current_base {
            current_base = &candidate.base_path;
            println!("[{}]", current_base);
        }
        println!("  {} ({})", candidate.folder_name, candidate.path.display());
    }
    println!();
    println!(
        "{} candidate(s). Add one with: savesync add <game-id> <path>",
        candidates.len()
    );
    Ok(())
}

fn cmd_list(store: &ConfigStore) -> Result<()> {
    let config = store.load();
    if config.games.is_empty() {
        println!("No games configured. Use: savesync add <game-id> <path>");
        return Ok(());
    }
    for game in &config.games {
        println!("{}", game.id);
        for path in &game.paths {
            println!("  -> {}", path);
        }
    }
    Ok(())
}

fn cmd_add(store: &ConfigStore, game_id: &str, path: &str) -> Result<()> {
    store
        .add_game(game_id, path)
        .context("Failed to update the config")?;
    println!("Added: {} -> {}", game_id.to_lowercase(), path);
    Ok(())
}

fn cmd_remove(store: &ConfigStore, game_id: &str, path: Option<&str>) -> Result<()> {
    store
        .remove_game(game_id, path)
        .context("Failed to update the config")?;
    match path {
        Some(path) => println!("Removed path {} from {}", path, game_id),
        None => println!("Removed: {}", game_id),
    }
    Ok(())
}

fn cmd_scan_root(store: &ConfigStore, action: ScanRootAction) -> Result<()> {
    match action {
        ScanRootAction::Add { path } => {
            store
                .add_scan_root(&path)
                .context("Failed to update the config")?;
            println!("Scan root added: {}", path);
        }
        ScanRootAction::Remove { path } => {
            store
                .remove_scan_root(&path)
                .context("Failed to update the config")?;
            println!("Scan root removed: {}", path);
        }
    }
    Ok(())
}

fn cmd_upload(store: &ConfigStore, game_id: Option<&str>) -> Result<()> {
    let config = store.load();
    let remote = remote_for(&config)?;
    let orchestrator = SyncOrchestrator::new(&config, &remote);

    match game_id {
        Some(game_id) => {
            let outcome = orchestrator.upload(game_id)?;
            print_outcome(game_id, &outcome);
        }
        None => {
            if config.games.is_empty() {
                println!("No games configured.");
                return Ok(());
            }
            let outcome = orchestrator.upload_all();
            print_outcome("all games", &outcome);
        }
    }
    Ok(())
}

fn cmd_download(store: &ConfigStore, game_id: Option<&str>, force: bool) -> Result<()> {
    let config = store.load();
    let remote = remote_for(&config)?;
    let orchestrator = SyncOrchestrator::new(&config, &remote);

    let (label, status) = match game_id {
        Some(game_id) => (game_id.to_string(), orchestrator.download(game_id, force)?),
        None => {
            if config.games.is_empty() {
                println!("No games configured.");
                return Ok(());
            }
            ("all games".to_string(), orchestrator.download_all(force))
        }
    };

    match status {
        DownloadStatus::Completed(outcome) => print_outcome(&label, &outcome),
        DownloadStatus::ConflictsPending(conflicts) => {
            println!("Download stopped: local files are newer than the cloud.");
            print_conflicts(&conflicts);
            println!();
            println!("Re-run with --force to overwrite them.");
        }
    }
    Ok(())
}

fn cmd_conflicts(store: &ConfigStore, game_id: &str) -> Result<()> {
    let config = store.load();
    let remote = remote_for(&config)?;
    let orchestrator = SyncOrchestrator::new(&config, &remote);

    let conflicts = orchestrator.check_conflicts(game_id)?;
    if conflicts.is_empty() {
        println!("{}: no conflicts, a download is safe.", game_id);
    } else {
        print_conflicts(&conflicts);
    }
    Ok(())
}

fn cmd_stats(store: &ConfigStore) -> Result<()> {
    let config = store.load();
    if config.games.is_empty() {
        println!("No games configured.");
        return Ok(());
    }
    let remote = remote_for(&config)?;
    let orchestrator = SyncOrchestrator::new(&config, &remote);

    println!(
        "{:<24} {:>12} {:<26} {:<26}",
        "GAME", "LOCAL SIZE", "LOCAL MODIFIED", "CLOUD MODIFIED"
    );
    for stats in orchestrator.game_stats() {
        println!(
            "{:<24} {:>12} {:<26} {:<26}",
            stats.game_id,
            format_size(stats.local_size_bytes),
            stats.local_last_modified.as_deref().unwrap_or("-"),
            stats.remote_last_modified.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn cmd_config(store: &ConfigStore) -> Result<()> {
    println!("{}", store.path().display());
    Ok(())
}

fn print_outcome(label: &str, outcome: &SyncOutcome) {
    if outcome.is_empty() {
        println!("{}: nothing to sync.", label);
        return;
    }
    println!(
        "{}: {} ok, {} failed.",
        label, outcome.ok_count, outcome.err_count
    );
    for error in outcome.errors.iter().take(MAX_SHOWN_ERRORS) {
        println!("  - {}", error);
    }
    if outcome.errors.len() > MAX_SHOWN_ERRORS {
        println!("  ... and {} more", outcome.errors.len() - MAX_SHOWN_ERRORS);
    }
}

fn print_conflicts(conflicts: &[DownloadConflict]) {
    for conflict in conflicts {
        println!(
            "  {} (local {}, cloud {})",
            conflict.filename, conflict.local_modified, conflict.remote_modified
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(26214400), "25.00 MB");
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
