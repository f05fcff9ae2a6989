//! Save-folder candidate discovery.
//!
//! Walks a bounded set of well-known base directories plus platform game
//! library layouts and user-supplied roots, applies the exclusion tables and
//! the signature heuristic, and yields deduplicated folder candidates for
//! the user to confirm. Scanning never mutates the filesystem and never
//! fails on an unreadable directory; such directories are skipped.

mod cracks;
mod exclude;
mod resolve;
mod signature;
mod steam;

pub use exclude::{is_excluded_folder, EXCLUDED_FOLDER_NAMES, EXCLUDED_PARTIAL_PATTERNS};
pub use resolve::{extract_app_id, TitleResolver};
pub use signature::{
    classify, has_save_hint, is_save_like_name, names_are_save_like, Signature,
    SAVE_NAME_HINTS, STRONG_SAVE_EXTENSIONS, WEAK_COOCCURRENCE_THRESHOLD, WEAK_SAVE_EXTENSIONS,
};

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::{dedup_key, expand_path};

/// A folder the scanner believes may hold a game's saves.
/// Ephemeral: produced fresh on every scan, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathCandidate {
    pub path: PathBuf,
    pub folder_name: String,
    pub base_path: String,
}

const BASE_PATH_TEMPLATES_WINDOWS: &[(&str, &str)] = &[
    ("%USERPROFILE%/Documents/My Games", "Documents/My Games"),
    ("%USERPROFILE%/Documents", "Documents"),
    ("%APPDATA%", "AppData"),
    ("%LOCALAPPDATA%", "LocalAppData"),
    ("%USERPROFILE%/Saved Games", "Saved Games"),
    ("%LOCALAPPDATA%/Low", "LocalAppData/Low"),
];

const BASE_PATH_TEMPLATES_UNIX: &[(&str, &str)] = &[
    ("~/.local/share", "Local Share"),
    ("~/.config", "Config"),
    ("~/Documents", "Documents"),
];

fn base_templates() -> &'static [(&'static str, &'static str)] {
    if cfg!(windows) {
        BASE_PATH_TEMPLATES_WINDOWS
    } else {
        BASE_PATH_TEMPLATES_UNIX
    }
}

/// Immediate subdirectories of a directory, as (path, name) pairs.
/// Hidden entries and unreadable directories yield nothing.
pub(crate) fn list_subdirs(dir_path: &Path) -> Vec<(PathBuf, String)> {
    let Ok(entries) = fs::read_dir(dir_path) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let meta = e.metadata().ok()?;
            if !meta.is_dir() {
                return None;
            }
            let name = e.file_name().into_string().ok()?;
            if name.starts_with('.') {
                return None;
            }
            Some((e.path(), name))
        })
        .collect()
}

/// File names in a folder and one additional level of child directories.
/// The co-occurrence count in the signature heuristic is taken over this
/// combined set, matching what a user sees as "the save folder".
fn collect_file_names(dir_path: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(entries) = fs::read_dir(dir_path) else {
        return names;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.is_file() {
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        } else if meta.is_dir() {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let Ok(sub_entries) = fs::read_dir(entry.path()) else {
                continue;
            };
            for sub in sub_entries.filter_map(|e| e.ok()) {
                let Ok(sub_meta) = sub.metadata() else {
                    continue;
                };
                if sub_meta.is_file() {
                    if let Ok(name) = sub.file_name().into_string() {
                        names.push(name);
                    }
                }
            }
        }
    }
    names
}

/// Whether a folder (or its immediate children) holds save-like evidence.
pub(crate) fn folder_contains_save_like_files(dir_path: &Path) -> bool {
    if !dir_path.is_dir() {
        return false;
    }
    names_are_save_like(&collect_file_names(dir_path))
}

#[cfg(windows)]
fn is_system_root(path: &Path) -> bool {
    let system_root = std::env::var("SystemDrive")
        .map(|d| format!("{}\\", d))
        .unwrap_or_else(|_| "C:\\".to_string())
        .to_lowercase();
    path.to_string_lossy().to_lowercase() == system_root
}

#[cfg(not(windows))]
fn is_system_root(_path: &Path) -> bool {
    false
}

/// Candidate scanner over well-known and user-supplied roots.
pub struct FolderScanner {
    bases: Vec<(String, String)>,
    extra_roots: Vec<String>,
    steam_root: Option<PathBuf>,
}

impl FolderScanner {
    /// Scanner over the platform-default base templates and, where present,
    /// the default Steam install root.
    pub fn new() -> Self {
        Self {
            bases: base_templates()
                .iter()
                .map(|(t, l)| (t.to_string(), l.to_string()))
                .collect(),
            extra_roots: Vec::new(),
            steam_root: steam::default_root(),
        }
    }

    /// Replace the base directories (labelled roots) to scan.
    pub fn with_bases<P: Into<String>, L: Into<String>>(mut self, bases: Vec<(P, L)>) -> Self {
        self.bases = bases
            .into_iter()
            .map(|(p, l)| (p.into(), l.into()))
            .collect();
        self
    }

    /// Add caller-supplied extra roots (config scan roots, CLI arguments).
    pub fn with_extra_roots<S: Into<String>>(mut self, roots: Vec<S>) -> Self {
        self.extra_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Override the Steam install root (mainly for tests).
    pub fn with_steam_root(mut self, root: Option<PathBuf>) -> Self {
        self.steam_root = root;
        self
    }

    /// Run the scan. Candidates are deduplicated by case-insensitive
    /// absolute path across every source and sorted by (base, name).
    pub fn scan(&self) -> Vec<PathCandidate> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        for (template, label) in &self.bases {
            if let Some(base) = expand_path(template) {
                scan_base(&base, label, &mut candidates, &mut seen);
            }
        }

        if let Some(root) = &self.steam_root {
            push_unique(steam::scan_userdata(root), &mut candidates, &mut seen);
            push_unique(steam::scan_library(root), &mut candidates, &mut seen);
            for lib in steam::library_paths(root) {
                push_unique(steam::scan_library(&lib), &mut candidates, &mut seen);
            }
        }

        if cfg!(windows) {
            push_unique(cracks::scan_all(), &mut candidates, &mut seen);
        }

        for raw in &self.extra_roots {
            let Some(path) = expand_path(raw) else {
                continue;
            };
            if !path.exists() {
                continue;
            }
            if is_system_root(&path) {
                tracing::warn!("refusing to scan the system root: {}", path.display());
                continue;
            }
            scan_base(&path, "Custom", &mut candidates, &mut seen);
        }

        candidates.sort_by(|a, b| {
            a.base_path
                .cmp(&b.base_path)
                .then_with(|| a.folder_name.cmp(&b.folder_name))
        });
        tracing::debug!("scan produced {} candidates", candidates.len());
        candidates
    }

    /// Scan and enrich candidate names through a title resolver.
    pub fn scan_with_titles(&self, resolver: &TitleResolver) -> Vec<PathCandidate> {
        let mut candidates = self.scan();
        resolver.enrich(&mut candidates);
        candidates
    }
}

impl Default for FolderScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn scan_base(
    base: &Path,
    label: &str,
    candidates: &mut Vec<PathCandidate>,
    seen: &mut HashSet<String>,
) {
    if !base.is_dir() {
        return;
    }
    for (full_path, name) in list_subdirs(base) {
        if is_excluded_folder(&name) {
            continue;
        }
        if !folder_contains_save_like_files(&full_path) {
            continue;
        }
        let key = dedup_key(&full_path);
        if !seen.insert(key) {
            continue;
        }
        candidates.push(PathCandidate {
            path: full_path,
            folder_name: name,
            base_path: label.to_string(),
        });
    }
}

fn push_unique(
    found: Vec<PathCandidate>,
    candidates: &mut Vec<PathCandidate>,
    seen: &mut HashSet<String>,
) {
    for candidate in found {
        let key = dedup_key(&candidate.path);
        if seen.insert(key) {
            candidates.push(candidate);
        }
    }
}
