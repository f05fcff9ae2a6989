//! Path placeholder expansion and normalization helpers.
//!
//! Configured save paths and scan templates may contain `%VAR%` environment
//! placeholders (Windows convention, honored on every platform) and a
//! leading `~` for the home directory. Expansion never fails: unknown
//! variables expand to the empty string and the result is returned as-is.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%]+)%").expect("valid env var pattern"));

/// Expand `%VAR%` placeholders and a leading `~` in a raw path string.
/// Returns `None` when the expansion collapses to an empty string.
pub fn expand_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    let mut result = trimmed.to_string();

    for cap in ENV_VAR_RE.captures_iter(trimmed) {
        let var = cap.get(1)?.as_str();
        let val = std::env::var(var).unwrap_or_default();
        result = result.replace(&format!("%{}%", var), &val);
    }

    if result.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = result
                .trim_start_matches('~')
                .trim_start_matches(['/', '\\']);
            result = if rest.is_empty() {
                home.to_string_lossy().to_string()
            } else {
                format!("{}/{}", home.to_string_lossy(), rest)
            };
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(PathBuf::from(result))
    }
}

/// Absolute form of a path, without requiring it to exist.
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Case-insensitive key used to deduplicate candidate and file paths.
pub fn dedup_key(path: &Path) -> String {
    absolutize(path).to_string_lossy().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var() {
        std::env::set_var("SAVESYNC_TEST_DIR", "/tmp/savesync");
        let expanded = expand_path("%SAVESYNC_TEST_DIR%/saves").unwrap();
        assert_eq!(expanded, PathBuf::from("/tmp/savesync/saves"));
    }

    #[test]
    fn test_expand_unknown_var_collapses() {
        // An unset variable expands to nothing; a path that was only the
        // variable collapses to empty and yields None.
        assert!(expand_path("%SAVESYNC_DOES_NOT_EXIST_12345%").is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        let expanded = expand_path("~/saves").unwrap();
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("saves"));
    }

    #[test]
    fn test_expand_bare_tilde() {
        let home = dirs::home_dir().unwrap();
        let expanded = expand_path("~").unwrap();
        assert_eq!(expanded, PathBuf::from(home.to_string_lossy().to_string()));
    }

    #[test]
    fn test_expand_plain_path_untouched() {
        let expanded = expand_path("/opt/games/saves").unwrap();
        assert_eq!(expanded, PathBuf::from("/opt/games/saves"));
    }

    #[test]
    fn test_expand_trims_whitespace() {
        let expanded = expand_path("  /opt/games  ").unwrap();
        assert_eq!(expanded, PathBuf::from("/opt/games"));
    }

    #[test]
    fn test_expand_empty() {
        assert!(expand_path("").is_none());
        assert!(expand_path("   ").is_none());
    }

    #[test]
    fn test_dedup_key_case_insensitive() {
        let a = dedup_key(Path::new("/Games/Elden Ring"));
        let b = dedup_key(Path::new("/games/elden ring"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_absolutize_relative() {
        let abs = absolutize(Path::new("saves"));
        assert!(abs.is_absolute());
    }
}
