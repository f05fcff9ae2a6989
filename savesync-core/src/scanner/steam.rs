//! Steam-specific candidate sources.
//!
//! Two kinds: per-user `userdata/<user>/<app>[/remote]` save directories,
//! where the layout itself is authoritative (numeric owner id, numeric
//! application id), and installed-game library roots listed in
//! `steamapps/libraryfolders.vdf`, which go through the regular folder
//! heuristic.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::{folder_contains_save_like_files, list_subdirs, PathCandidate};
use crate::paths::dedup_key;

#[cfg(windows)]
const DEFAULT_STEAM_ROOT: &str = "C:\\Program Files (x86)\\Steam";

static VDF_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""path"\s+"([^"]+)""#).expect("valid vdf path pattern"));

/// Platform-default Steam install root, if present.
pub fn default_root() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        let root = PathBuf::from(DEFAULT_STEAM_ROOT);
        if root.exists() {
            return Some(root);
        }
    }
    None
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Enumerate `userdata/<user>/<app>` save directories under a Steam root.
/// The directory structure is trusted, so only the save-evidence check
/// applies, not the folder-name exclusion list. A `remote` subfolder is
/// preferred over the app directory when it exists.
pub fn scan_userdata(steam_root: &Path) -> Vec<PathCandidate> {
    let userdata = steam_root.join("userdata");
    let mut out = Vec::new();
    for (user_dir, user_name) in list_subdirs(&userdata) {
        if !is_numeric(&user_name) {
            continue;
        }
        for (app_dir, app_name) in list_subdirs(&user_dir) {
            if !is_numeric(&app_name) {
                continue;
            }
            let remote = app_dir.join("remote");
            let target = if remote.is_dir() { remote } else { app_dir };
            if !folder_contains_save_like_files(&target) {
                continue;
            }
            out.push(PathCandidate {
                path: target,
                folder_name: format!("Steam App {}", app_name),
                base_path: format!("Steam userdata ({})", user_name),
            });
        }
    }
    out
}

/// Extract library "path" entries from libraryfolders.vdf content.
/// VDF escapes backslashes, so `D:\\Games` means `D:\Games`.
pub fn parse_library_folders(content: &str) -> Vec<PathBuf> {
    VDF_PATH_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| PathBuf::from(m.as_str().replace("\\\\", "\\")))
        .collect()
}

/// Library roots declared in the Steam root's manifest, excluding the Steam
/// root itself (its `steamapps/common` is scanned separately).
pub fn library_paths(steam_root: &Path) -> Vec<PathBuf> {
    let vdf = steam_root.join("steamapps").join("libraryfolders.vdf");
    let Ok(content) = std::fs::read_to_string(&vdf) else {
        return Vec::new();
    };
    let root_key = dedup_key(steam_root);
    parse_library_folders(&content)
        .into_iter()
        .filter(|p| p.is_dir() && dedup_key(p) != root_key)
        .collect()
}

/// Scan one library's `steamapps/common` with the regular folder heuristic.
pub fn scan_library(library_path: &Path) -> Vec<PathCandidate> {
    let common = library_path.join("steamapps").join("common");
    let mut out = Vec::new();
    for (full_path, name) in list_subdirs(&common) {
        if !folder_contains_save_like_files(&full_path) {
            continue;
        }
        out.push(PathCandidate {
            path: full_path,
            folder_name: name,
            base_path: format!("Steam Library ({})", library_path.display()),
        });
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
    fn test_parse_library_folders() {
        let vdf = r#"
"libraryfolders"
{
    "0"
    {
        "path"        "C:\\Program Files (x86)\\Steam"
        "label"        ""
    }
    "1"
    {
        "path"        "D:\\SteamLibrary"
    }
}
"#;
        let paths = parse_library_folders(vdf);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], PathBuf::from(r"C:\Program Files (x86)\Steam"));
        assert_eq!(paths[1], PathBuf::from(r"D:\SteamLibrary"));
    }

    #[test]
    fn test_parse_library_folders_empty() {
        assert!(parse_library_folders("").is_empty());
        assert!(parse_library_folders("\"label\" \"whatever\"").is_empty());
    }

    #[test]
    fn test_scan_userdata_prefers_remote() {
        let root = TempDir::new().unwrap();
        touch(
            &root
                .path()
                .join("userdata/111/2050650/remote/profile.sav"),
        );

        let candidates = scan_userdata(root.path());
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].path.ends_with("remote"));
        assert_eq!(candidates[0].folder_name, "Steam App 2050650");
        assert_eq!(candidates[0].base_path, "Steam userdata (111)");
    }

    #[test]
    fn test_scan_userdata_skips_non_numeric() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("userdata/notauser/123/save.sav"));
        touch(&root.path().join("userdata/111/notanapp/save.sav"));

        assert!(scan_userdata(root.path()).is_empty());
    }

    #[test]
    fn test_scan_userdata_requires_evidence() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("userdata/111/400/remote/readme.txt"));

        assert!(scan_userdata(root.path()).is_empty());
    }

    #[test]
    fn test_scan_library_applies_heuristic() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("steamapps/common/Elden Ring/ER0000.sl2"));
        touch(&root.path().join("steamapps/common/Some Tool/tool.exe"));

        let candidates = scan_library(root.path());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].folder_name, "Elden Ring");
    }

    #[test]
    fn test_missing_root_is_empty() {
        let root = TempDir::new().unwrap();
        assert!(scan_userdata(&root.path().join("nope")).is_empty());
        assert!(scan_library(&root.path().join("nope")).is_empty());
    }
}
