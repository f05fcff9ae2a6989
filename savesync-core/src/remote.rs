//! Remote save directory: the presigned-URL REST surface.
//!
//! The API is small: list the owner's objects, mint a one-time upload URL
//! for a (game, relative path), mint a one-time download URL for a key.
//! Transfers themselves go straight against the presigned URL as a raw
//! byte stream. Authentication is an owner id plus a shared key sent as
//! headers; the engine knows nothing else about the store.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SyncError};

const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

/// One object in the remote store, keyed `{ownerId}/{gameId}/{relativePath}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSaveRecord {
    pub game_id: String,
    pub key: String,
    /// Relative path under the game, derived from the key.
    pub filename: String,
    /// Timestamp as the store reports it; parsed only at comparison time.
    pub last_modified: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One-time upload destination.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub url: String,
    pub key: String,
}

/// One-time download source.
#[derive(Debug, Clone)]
pub struct DownloadSource {
    pub url: String,
}

/// Capability surface of the remote store.
pub trait RemoteSaveDirectory {
    fn list_saves(&self) -> Result<Vec<RemoteSaveRecord>>;
    fn issue_upload_target(&self, game_id: &str, filename: &str) -> Result<UploadTarget>;
    fn issue_download_source(&self, game_id: &str, key: &str) -> Result<DownloadSource>;
    fn put_bytes(&self, url: &str, bytes: Vec<u8>) -> Result<()>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Strip the `{ownerId}/{gameId}/` prefix from a key. Keys with fewer than
/// three segments pass through unchanged.
pub fn filename_from_key(key: &str) -> String {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() >= 3 {
        parts[2..].join("/")
    } else {
        key.to_string()
    }
}

fn join_endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteSaveDto {
    game_id: String,
    key: String,
    last_modified: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlDto {
    upload_url: String,
    key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadUrlDto {
    download_url: String,
}

/// HTTP client against the save API.
pub struct HttpRemoteDirectory {
    client: reqwest::blocking::Client,
    base_url: String,
    owner_id: String,
    api_key: String,
}

impl HttpRemoteDirectory {
    pub fn new(base_url: &str, owner_id: &str, api_key: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("savesync/", env!("CARGO_PKG_VERSION")))
            .timeout(TRANSFER_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner_id: owner_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn api_get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        let url = join_endpoint(&self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("x-user-id", &self.owner_id)
            .header("x-api-key", &self.api_key)
            .send()?;
        Ok(resp)
    }

    fn api_post(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::blocking::Response> {
        let url = join_endpoint(&self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("x-user-id", &self.owner_id)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()?;
        Ok(resp)
    }
}

fn ensure_success(resp: reqwest::blocking::Response, context: &str) -> Result<reqwest::blocking::Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(SyncError::Api {
            context: context.to_string(),
            status: resp.status().as_u16(),
        })
    }
}

impl RemoteSaveDirectory for HttpRemoteDirectory {
    fn list_saves(&self) -> Result<Vec<RemoteSaveRecord>> {
        let resp = ensure_success(self.api_get("/saves")?, "list saves")?;
        let raw: Vec<RemoteSaveDto> = resp.json()?;
        Ok(raw
            .into_iter()
            .map(|dto| RemoteSaveRecord {
                filename: filename_from_key(&dto.key),
                game_id: dto.game_id,
                key: dto.key,
                last_modified: dto.last_modified,
                size: dto.size,
            })
            .collect())
    }

    fn issue_upload_target(&self, game_id: &str, filename: &str) -> Result<UploadTarget> {
        let body = serde_json::json!({ "gameId": game_id, "filename": filename });
        let resp = ensure_success(self.api_post("/saves/upload-url", &body)?, "upload-url")?;
        let dto: UploadUrlDto = resp.json()?;
        Ok(UploadTarget {
            url: dto.upload_url,
            key: dto.key,
        })
    }

    fn issue_download_source(&self, game_id: &str, key: &str) -> Result<DownloadSource> {
        let body = serde_json::json!({ "gameId": game_id, "key": key });
        let resp = ensure_success(self.api_post("/saves/download-url", &body)?, "download-url")?;
        let dto: DownloadUrlDto = resp.json()?;
        Ok(DownloadSource {
            url: dto.download_url,
        })
    }

    fn put_bytes(&self, url: &str, bytes: Vec<u8>) -> Result<()> {
        let resp = self
            .client
            .put(url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()?;
        ensure_success(resp, "presigned PUT")?;
        Ok(())
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = ensure_success(self.client.get(url).send()?, "presigned GET")?;
        Ok(resp.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_key() {
        assert_eq!(
            filename_from_key("einar/elden-ring/ER0000.sl2"),
            "ER0000.sl2"
        );
        assert_eq!(
            filename_from_key("einar/hades/profiles/slot1.sav"),
            "profiles/slot1.sav"
        );
        // Degenerate keys pass through.
        assert_eq!(filename_from_key("loose-object"), "loose-object");
        assert_eq!(filename_from_key("a/b"), "a/b");
    }

    #[test]
    fn test_join_endpoint_trims_slash() {
        assert_eq!(
            join_endpoint("https://api.example.com/", "/saves"),
            "https://api.example.com/saves"
        );
        assert_eq!(
            join_endpoint("https://api.example.com", "/saves"),
            "https://api.example.com/saves"
        );
    }

    #[test]
    fn test_remote_save_dto_wire_format() {
        let raw = r#"[{
            "gameId": "elden-ring",
            "key": "einar/elden-ring/ER0000.sl2",
            "lastModified": "2026-08-01T10:00:00Z",
            "size": 26214400
        }]"#;
        let dtos: Vec<RemoteSaveDto> = serde_json::from_str(raw).unwrap();
        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0].game_id, "elden-ring");
        assert_eq!(dtos[0].size, Some(26214400));
    }

    #[test]
    fn test_remote_save_dto_size_optional() {
        let raw = r#"[{
            "gameId": "hades",
            "key": "einar/hades/save.sav",
            "lastModified": "2026-08-01T10:00:00Z"
        }]"#;
        let dtos: Vec<RemoteSaveDto> = serde_json::from_str(raw).unwrap();
        assert_eq!(dtos[0].size, None);
    }
}
