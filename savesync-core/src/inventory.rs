//! Local file enumeration for configured save paths.
//!
//! Each configured path may be a single file or a directory tree. Relative
//! paths are computed against the input path's own root with forward-slash
//! separators on every platform, so they can be matched against remote
//! record filenames directly.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::paths::{absolutize, expand_path};
use crate::scanner::is_save_like_name;

/// One local file under a configured save path.
/// Ephemeral: produced per sync operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFileRef {
    pub absolute: PathBuf,
    /// POSIX-style path relative to the configured root it was found under.
    pub relative: String,
}

/// Every file under the given paths, unfiltered. Upload trusts this as the
/// save set: the user explicitly configured these paths.
pub fn list_all_files(paths: &[String]) -> Vec<LocalFileRef> {
    collect(paths, None)
}

/// Same traversal filtered through the save-like extension check only.
pub fn list_save_like_files(paths: &[String]) -> Vec<LocalFileRef> {
    collect(paths, Some(&is_save_like_name))
}

fn collect(paths: &[String], filter: Option<&dyn Fn(&str) -> bool>) -> Vec<LocalFileRef> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::new();

    for raw in paths {
        let Some(expanded) = expand_path(raw) else {
            continue;
        };
        let root = absolutize(&expanded);
        if !root.exists() {
            continue;
        }

        if root.is_file() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if filter.map_or(true, |f| f(&name)) && seen.insert(root.clone()) {
                out.push(LocalFileRef {
                    absolute: root,
                    relative: name,
                });
            }
            continue;
        }

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                // Hidden directories are skipped wholesale; hidden files pass.
                !(e.file_type().is_dir() && e.file_name().to_string_lossy().starts_with('.'))
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !filter.map_or(true, |f| f(&name)) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let relative = rel.to_string_lossy().replace('\\', "/");
            let absolute = entry.path().to_path_buf();
            if seen.insert(absolute.clone()) {
                out.push(LocalFileRef { absolute, relative });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn path_str(p: &Path) -> String {
        p.to_string_lossy().to_string()
    }

    #[test]
    fn test_lists_nested_files_with_relative_paths() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("slot1.sav"));
        touch(&root.path().join("profiles/player/data.bin"));

        let mut files = list_all_files(&[path_str(root.path())]);
        files.sort_by(|a, b| a.relative.cmp(&b.relative));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative, "profiles/player/data.bin");
        assert_eq!(files[1].relative, "slot1.sav");
    }

    #[test]
    fn test_single_file_path() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("ER0000.sl2");
        touch(&file);

        let files = list_all_files(&[path_str(&file)]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "ER0000.sl2");
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join(".git/config.dat"));
        touch(&root.path().join("save.dat"));

        let files = list_all_files(&[path_str(root.path())]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "save.dat");
    }

    #[test]
    fn test_missing_paths_skipped() {
        let files = list_all_files(&["/no/such/path".to_string()]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_dedup_across_inputs() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("save.sav"));

        let p = path_str(root.path());
        let files = list_all_files(&[p.clone(), p]);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_save_like_filter() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("progress.json"));
        touch(&root.path().join("save.sav"));
        touch(&root.path().join("unrelated.txt"));

        let mut files = list_save_like_files(&[path_str(root.path())]);
        files.sort_by(|a, b| a.relative.cmp(&b.relative));

        let names: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(names, vec!["progress.json", "save.sav"]);
    }

    #[test]
    fn test_all_files_unfiltered() {
        // Upload takes everything under a configured path, extensions aside.
        let root = TempDir::new().unwrap();
        touch(&root.path().join("unrelated.txt"));

        let files = list_all_files(&[path_str(root.path())]);
        assert_eq!(files.len(), 1);
    }
}
