//! SaveSync - Local-Cloud Game Save Synchronization
//!
//! Discovers plausible game-save folders on an unstructured filesystem and
//! synchronizes per-game file sets against an object-storage-backed save
//! service that issues one-time transfer URLs.

pub mod config;
pub mod conflict;
pub mod error;
pub mod inventory;
pub mod paths;
pub mod remote;
pub mod scanner;
pub mod stats;
pub mod sync;

pub use config::{Config, ConfigStore, ConfiguredGame};
pub use conflict::DownloadConflict;
pub use error::{Result, SyncError};
pub use inventory::LocalFileRef;
pub use remote::{HttpRemoteDirectory, RemoteSaveDirectory, RemoteSaveRecord};
pub use scanner::{FolderScanner, PathCandidate, TitleResolver};
pub use stats::GameStats;
pub use sync::{DownloadStatus, SyncOrchestrator, SyncOutcome};

/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
