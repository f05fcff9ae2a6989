//! Save-file signature classification.
//!
//! There is no single standard for save-file naming, so detection is a
//! two-tier heuristic. Strong extensions are proprietary save formats and
//! qualify a folder on their own. Weak extensions are generic data/backup
//! formats shared with plenty of non-game software; they only count when the
//! file name carries a save-indicating keyword, or when enough of them
//! co-occur in the same folder.

/// Extensions that immediately mark a file as a save.
/// `.sl2` is FromSoftware (Sekiro, Dark Souls, Elden Ring).
pub const STRONG_SAVE_EXTENSIONS: &[&str] = &[".sav", ".savx", ".save", ".sl2", ".state", ".sr"];

/// Generic data/binary/backup extensions. Evidence only in combination.
pub const WEAK_SAVE_EXTENSIONS: &[&str] = &[".dat", ".bin", ".bak"];

/// Keywords in a base name that raise a weak extension to save evidence.
pub const SAVE_NAME_HINTS: &[&str] = &[
    "save",
    "slot",
    "profile",
    "progress",
    "checkpoint",
    "autosave",
    "quicksave",
    "player",
    "game",
];

/// Minimum number of hint-less weak files that must co-occur in one folder
/// scan before the folder counts as save-like.
pub const WEAK_COOCCURRENCE_THRESHOLD: usize = 3;

/// Broad extension list used by the file inventory's save-like filter.
/// Wider than the scan heuristic: config-style formats are included because
/// plenty of games keep progress in them, and `.sav.` matches numbered
/// rotations like `slot.sav.001`.
const INVENTORY_SAVE_EXTENSIONS: &[&str] = &[
    ".sav", ".savx", ".save", ".sl2", ".dat", ".bin", ".json", ".bak", ".db", ".sqlite", ".state",
    ".xml", ".cfg", ".ini", ".sr", ".sav.",
];

/// Strength of save evidence a single file name carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// Proprietary save extension, qualifies on its own.
    Strong,
    /// Generic extension, needs a name hint or co-occurrence.
    Weak,
    /// No save evidence.
    None,
}

/// Classify a single file name.
pub fn classify(name: &str) -> Signature {
    let lower = name.to_lowercase();
    if STRONG_SAVE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext) || lower.contains(&format!("{}.", ext)))
    {
        return Signature::Strong;
    }
    if WEAK_SAVE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Signature::Weak;
    }
    Signature::None
}

/// Whether the base name carries a save-indicating keyword.
pub fn has_save_hint(name: &str) -> bool {
    let lower = name.to_lowercase();
    SAVE_NAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Extension-only filter used by `inventory::list_save_like_files`.
/// No co-occurrence heuristic here: a single matching name passes.
pub fn is_save_like_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    INVENTORY_SAVE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext) || (ext.len() > 1 && lower.contains(ext)))
}

/// Evaluate the names collected from one folder scan.
/// Strong evidence or a hinted weak file qualifies immediately; otherwise
/// the weak co-occurrence count decides.
pub fn names_are_save_like<S: AsRef<str>>(names: &[S]) -> bool {
    let mut weak_count = 0usize;
    for name in names {
        match classify(name.as_ref()) {
            Signature::Strong => return true,
            Signature::Weak => {
                if has_save_hint(name.as_ref()) {
                    return true;
                }
                weak_count += 1;
            }
            Signature::None => {}
        }
    }
    weak_count >= WEAK_COOCCURRENCE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_strong() {
        assert_eq!(classify("ER0000.sl2"), Signature::Strong);
        assert_eq!(classify("GAME.SAV"), Signature::Strong);
        assert_eq!(classify("quick.state"), Signature::Strong);
    }

    #[test]
    fn test_classify_strong_infix() {
        // Numbered rotations keep the strong extension mid-name.
        assert_eq!(classify("slot.sav.001"), Signature::Strong);
        assert_eq!(classify("world.save.bak2"), Signature::Strong);
    }

    #[test]
    fn test_classify_weak() {
        assert_eq!(classify("cache.dat"), Signature::Weak);
        assert_eq!(classify("index.bin"), Signature::Weak);
        assert_eq!(classify("settings.bak"), Signature::Weak);
    }

    #[test]
    fn test_classify_none() {
        assert_eq!(classify("readme.txt"), Signature::None);
        assert_eq!(classify("engine.dll"), Signature::None);
    }

    #[test]
    fn test_hints() {
        assert!(has_save_hint("autosave1.dat"));
        assert!(has_save_hint("PlayerProfile.bin"));
        assert!(!has_save_hint("cache.dat"));
    }

    #[test]
    fn test_names_save_like_with_hints() {
        // Scenario: weak extensions with save-indicating names qualify
        // without reaching the co-occurrence threshold.
        let names = ["slot1.dat", "slot2.dat", "slot3.dat"];
        assert!(names_are_save_like(&names));
        assert!(names_are_save_like(&["slot1.dat"]));
    }

    #[test]
    fn test_names_not_save_like_below_threshold() {
        // Two hint-less weak files stay below the threshold.
        let names = ["cache.dat", "index.dat"];
        assert!(!names_are_save_like(&names));
    }

    #[test]
    fn test_names_save_like_at_threshold() {
        let names = ["a.dat", "b.dat", "c.bin"];
        assert!(names_are_save_like(&names));
    }

    #[test]
    fn test_monotonicity() {
        // Adding more hinted weak files never disqualifies a folder.
        let mut names = vec!["slot1.dat".to_string()];
        assert!(names_are_save_like(&names));
        for i in 2..20 {
            names.push(format!("slot{}.dat", i));
            assert!(names_are_save_like(&names));
        }
    }

    #[test]
    fn test_inventory_filter() {
        assert!(is_save_like_name("progress.json"));
        assert!(is_save_like_name("save.db"));
        assert!(is_save_like_name("options.ini"));
        assert!(is_save_like_name("file.sav.001"));
        assert!(!is_save_like_name("launcher.exe"));
        assert!(!is_save_like_name("notes.txt"));
    }
}
