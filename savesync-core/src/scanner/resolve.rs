//! Best-effort resolution of numeric application ids to display titles.
//!
//! Candidate folder names like "Steam App 2551020" carry the application id
//! but not the game's title. The Steam storefront's public appdetails
//! endpoint turns ids into names; results are cached for the lifetime of the
//! resolver, lookups run in parallel with a bounded per-request timeout, and
//! every failure is swallowed per id. This is advisory labeling only: the
//! scan result is complete and correct without it.

use rayon::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

use super::PathCandidate;

const APPDETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

static APP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4,})\b").expect("valid app id pattern"));

/// Extract a numeric application id (4+ digits) from a candidate name.
pub fn extract_app_id(folder_name: &str) -> Option<String> {
    APP_ID_RE
        .captures(folder_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn apply_title(folder_name: &str, title: &str) -> String {
    format!("{} — {}", folder_name, title)
}

/// Resolver component owning the id→title cache.
///
/// Process-lifetime state lives here rather than in a global, so tests can
/// construct a fresh resolver or clear the cache between runs.
pub struct TitleResolver {
    client: reqwest::blocking::Client,
    cache: Mutex<HashMap<String, String>>,
}

impl TitleResolver {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("savesync/", env!("CARGO_PKG_VERSION")))
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn fetch_title(&self, app_id: &str) -> Option<String> {
        let url = format!("{}?appids={}", APPDETAILS_URL, app_id);
        let resp = self.client.get(&url).send().ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let body: serde_json::Value = resp.json().ok()?;
        let entry = body.get(app_id)?;
        if !entry.get("success")?.as_bool().unwrap_or(false) {
            return None;
        }
        entry
            .get("data")?
            .get("name")?
            .as_str()
            .map(|s| s.to_string())
    }

    /// Resolve a set of ids, serving cache hits and fetching the rest in
    /// parallel. Ids that cannot be resolved are absent from the result.
    pub fn resolve_many(&self, ids: &[String]) -> HashMap<String, String> {
        let mut resolved = HashMap::new();
        let mut to_fetch = Vec::new();

        if let Ok(cache) = self.cache.lock() {
            for id in ids {
                match cache.get(id) {
                    Some(title) => {
                        resolved.insert(id.clone(), title.clone());
                    }
                    None => to_fetch.push(id.clone()),
                }
            }
        }

        if to_fetch.is_empty() {
            return resolved;
        }

        let fetched: Vec<(String, String)> = to_fetch
            .par_iter()
            .filter_map(|id| self.fetch_title(id).map(|title| (id.clone(), title)))
            .collect();

        if let Ok(mut cache) = self.cache.lock() {
            for (id, title) in &fetched {
                cache.insert(id.clone(), title.clone());
            }
        }
        resolved.extend(fetched);
        resolved
    }

    /// Rewrite candidate display names in place where an embedded id
    /// resolves to a title. Unresolved ids leave the name untouched.
    pub fn enrich(&self, candidates: &mut [PathCandidate]) {
        let ids: Vec<String> = candidates
            .iter()
            .filter_map(|c| extract_app_id(&c.folder_name))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return;
        }

        let titles = self.resolve_many(&ids);
        tracing::debug!("resolved {} of {} app ids", titles.len(), ids.len());

        for candidate in candidates {
            if let Some(id) = extract_app_id(&candidate.folder_name) {
                if let Some(title) = titles.get(&id) {
                    candidate.folder_name = apply_title(&candidate.folder_name, title);
                }
            }
        }
    }

    #[cfg(test)]
    fn prime(&self, id: &str, title: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(id.to_string(), title.to_string());
        }
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_app_id() {
        assert_eq!(
            extract_app_id("Steam App 2551020"),
            Some("2551020".to_string())
        );
        assert_eq!(
            extract_app_id("EMPRESS — 2050650"),
            Some("2050650".to_string())
        );
        assert_eq!(extract_app_id("Elden Ring"), None);
        // Short numbers are not app ids.
        assert_eq!(extract_app_id("Slot 12"), None);
    }

    #[test]
    fn test_resolve_many_serves_cache() {
        let resolver = TitleResolver::new();
        resolver.prime("2050650", "Resident Evil 4");

        let titles = resolver.resolve_many(&["2050650".to_string()]);
        assert_eq!(titles.get("2050650").map(String::as_str), Some("Resident Evil 4"));
    }

    #[test]
    fn test_clear_cache() {
        let resolver = TitleResolver::new();
        resolver.prime("1245620", "ELDEN RING");
        resolver.clear_cache();
        assert!(resolver.cache.lock().unwrap().is_empty());
    }

    #[test]
    fn test_enrich_rewrites_resolved_names() {
        let resolver = TitleResolver::new();
        resolver.prime("1245620", "ELDEN RING");

        let mut candidates = vec![
            PathCandidate {
                path: PathBuf::from("/tmp/1245620"),
                folder_name: "Steam App 1245620".to_string(),
                base_path: "Steam userdata (1)".to_string(),
            },
            PathCandidate {
                path: PathBuf::from("/tmp/hades"),
                folder_name: "Hades".to_string(),
                base_path: "Documents".to_string(),
            },
        ];
        resolver.enrich(&mut candidates);

        assert_eq!(candidates[0].folder_name, "Steam App 1245620 — ELDEN RING");
        // No embedded id: untouched.
        assert_eq!(candidates[1].folder_name, "Hades");
    }
}
