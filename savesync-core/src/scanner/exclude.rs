//! Folder exclusion tables for the candidate scan.
//!
//! Noise is suppressed at the source instead of filtering results post hoc:
//! exact lowercase names cover OS directories, package-manager caches, known
//! non-game applications and launcher/platform directories, while partial
//! patterns catch installer/runtime folders regardless of vendor prefix.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Exact folder names (lowercase) that are never save candidates.
pub static EXCLUDED_FOLDER_NAMES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // === OS ===
        "windows",
        "users",
        "program files",
        "program files (x86)",
        "programdata",
        "recovery",
        "perflogs",
        "$recycle.bin",
        "system volume information",
        "msocache",
        "boot",
        "intel",
        "amd",
        // === Developer tooling ===
        "code",
        "cursor",
        "visual studio setup",
        "git extensions",
        "gitextensions",
        "github-copilot",
        "cmaketools",
        "visualstudiodiscordrpc",
        "jetbrains",
        // === Desktop apps ===
        "discord",
        "spotify",
        "zoom",
        "slack",
        "telegram desktop",
        "whatsapp",
        "google",
        "microsoft",
        "nvidia corporation",
        "connecteddevicesplatform",
        "mozilla",
        "chrome",
        "firefox",
        "edge",
        "opera",
        "brave",
        // === Package managers ===
        "npm",
        "pnpm",
        "pnpm-state",
        "node_modules",
        "packages",
        "amplify",
        "turborepo",
        "nextjs-nodejs",
        "theme-liquid-docs-nodejs",
        ".bun",
        ".npm",
        ".cache",
        ".local",
        ".config",
        // === Utilities ===
        "obs-studio",
        "qbittorrent",
        "utorrent web",
        "winrar",
        "7-zip",
        "process hacker 2",
        "xdg.config",
        "ccleaner",
        // === Launchers and platforms ===
        "steam",
        "steamlibrary",
        "sklauncher",
        "riot-client-ux",
        "riot games",
        "firestorm launcher",
        "launcher-updater",
        "overwolf",
        "overframe-ow-app-updater",
        "overframe",
        "wago-app",
        "wago-app-updater",
        "battleye",
        "epic games",
        "ea games",
        "ubisoft",
        "gog galaxy",
        "battle.net",
        "roblox",
        "robloxpcgdk",
        // === Transient ===
        "temp",
        "tmp",
        "crashdumps",
        "squirreltemp",
        "programs",
        "logs",
        "cache",
        "savesync",
    ]
    .into_iter()
    .collect()
});

/// Substring patterns that exclude a folder wherever they appear in its name.
pub const EXCLUDED_PARTIAL_PATTERNS: &[&str] = &[
    "server_pack",
    "server pack",
    "_server",
    "backup",
    "driver",
    "installer",
    "setup",
    "redistributable",
    "redist",
    "runtime",
    "sdk",
    "dotnet",
    ".net",
    "visual c++",
    "vcredist",
    "directx",
];

/// Whether a folder name is excluded from the scan, by exact lowercase name
/// or by partial pattern.
pub fn is_excluded_folder(name: &str) -> bool {
    let lower = name.to_lowercase().trim().to_string();
    if EXCLUDED_FOLDER_NAMES.contains(lower.as_str()) {
        return true;
    }
    EXCLUDED_PARTIAL_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names_excluded() {
        assert!(is_excluded_folder("Discord"));
        assert!(is_excluded_folder("node_modules"));
        assert!(is_excluded_folder("Program Files (x86)"));
        assert!(is_excluded_folder("  Steam  "));
    }

    #[test]
    fn test_partial_patterns_excluded() {
        assert!(is_excluded_folder("NVIDIA Driver Backup"));
        assert!(is_excluded_folder("DirectX Redist"));
        assert!(is_excluded_folder("MyGame_Server"));
        assert!(is_excluded_folder("Visual C++ Runtime"));
    }

    #[test]
    fn test_game_folders_not_excluded() {
        assert!(!is_excluded_folder("Elden Ring"));
        assert!(!is_excluded_folder("My Games"));
        assert!(!is_excluded_folder("Hades"));
    }

    #[test]
    fn test_own_config_dir_excluded() {
        // The engine's own config directory must never surface as a candidate.
        assert!(is_excluded_folder("savesync"));
    }
}
