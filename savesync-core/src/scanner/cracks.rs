//! Save locations used by unauthorized distributions.
//!
//! These emulators drop saves under a handful of well-known roots, one
//! subfolder per application id, but nest the actual files arbitrarily.
//! Each app-id subfolder is therefore searched up to five levels deep,
//! skipping the emulators' own settings directories.

use std::path::Path;

use super::{folder_contains_save_like_files, list_subdirs, PathCandidate};
use crate::paths::expand_path;

/// Known save roots, as (path template, label) pairs.
pub const CRACK_SAVE_LOCATIONS: &[(&str, &str)] = &[
    ("C:\\Users\\Public\\Documents\\EMPRESS", "EMPRESS"),
    ("C:\\Users\\Public\\Documents\\Steam", "CODEX/Steam emu"),
    ("%APPDATA%\\Goldberg SteamEmu Saves", "Goldberg"),
    ("%APPDATA%\\CODEX", "CODEX"),
    ("%APPDATA%\\CPY_SAVES", "CPY (Conspir4cy)"),
    ("%APPDATA%\\Skidrow", "Skidrow"),
    ("%LOCALAPPDATA%\\CODEX", "CODEX (Local)"),
    ("%USERPROFILE%\\Documents\\CPY_SAVES", "CPY (Documents)"),
];

const MAX_DEPTH: usize = 5;

fn is_settings_dir(name: &str) -> bool {
    name == "steam_settings" || name == "settings"
}

/// Depth-bounded search for save evidence anywhere under a directory.
pub fn contains_saves_at_any_depth(dir_path: &Path, depth: usize) -> bool {
    if depth > MAX_DEPTH || !dir_path.is_dir() {
        return false;
    }
    if folder_contains_save_like_files(dir_path) {
        return true;
    }
    for (sub_path, name) in list_subdirs(dir_path) {
        if is_settings_dir(&name) {
            continue;
        }
        if contains_saves_at_any_depth(&sub_path, depth + 1) {
            return true;
        }
    }
    false
}

/// Scan one crack root: every app-id subfolder holding save evidence at any
/// depth becomes a candidate.
pub fn scan_crack_base(base: &Path, label: &str) -> Vec<PathCandidate> {
    let mut out = Vec::new();
    for (app_dir, name) in list_subdirs(base) {
        if is_settings_dir(&name) {
            continue;
        }
        if !contains_saves_at_any_depth(&app_dir, 0) {
            continue;
        }
        out.push(PathCandidate {
            path: app_dir,
            folder_name: format!("{} — {}", label, name),
            base_path: format!("{} ({})", label, base.display()),
        });
    }
    out
}

/// Expand the known templates and scan each existing root.
pub fn scan_all() -> Vec<PathCandidate> {
    let mut out = Vec::new();
    for (template, label) in CRACK_SAVE_LOCATIONS {
        let Some(base) = expand_path(template) else {
            continue;
        };
        if !base.is_dir() {
            continue;
        }
        out.extend(scan_crack_base(&base, label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_nested_saves_found() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("2050650/storage/user/0/savegame.sav"));

        let candidates = scan_crack_base(root.path(), "Goldberg");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].folder_name, "Goldberg — 2050650");
    }

    #[test]
    fn test_depth_limit() {
        let root = TempDir::new().unwrap();
        // Seven levels below the app-id folder, past the bound.
        touch(&root.path().join("123/a/b/c/d/e/f/g/save.sav"));

        assert!(scan_crack_base(root.path(), "CODEX").is_empty());
    }

    #[test]
    fn test_settings_dirs_skipped() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("steam_settings/force_account.sav"));
        touch(&root.path().join("480/steam_settings/sub/user.sav"));

        // The top-level settings dir is never a candidate, and the recursion
        // does not descend into a nested settings dir.
        assert!(scan_crack_base(root.path(), "Goldberg").is_empty());
    }

    #[test]
    fn test_no_evidence_no_candidate() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("480/readme.txt"));

        assert!(scan_crack_base(root.path(), "Skidrow").is_empty());
    }
}
