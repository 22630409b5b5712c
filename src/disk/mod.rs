//! Yandex.Disk REST client and document viewer URLs.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";
const HTTP_TIMEOUT_SECS: u64 = 20;
const LIST_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("disk api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("disk api returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One entry of a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResourceItem {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(rename = "_embedded", default)]
    embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize, Default)]
struct Embedded {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

/// Authenticated client for folder listings.
pub struct DiskClient {
    http: reqwest::Client,
    token: String,
}

impl DiskClient {
    pub fn new(token: impl Into<String>) -> Result<Self, DiskError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
        })
    }

    /// List one folder. Items beyond the first 1000 are not paged; the
    /// documentation tree keeps folders far below that.
    pub async fn get_folder_contents(&self, path: &str) -> Result<Vec<ResourceItem>, DiskError> {
        let limit = LIST_LIMIT.to_string();
        let response = self
            .http
            .get(format!("{API_BASE}/resources"))
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("path", path), ("limit", limit.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DiskError::Status(response.status()));
        }
        let body: ResourceResponse = response.json().await?;
        Ok(body.embedded.unwrap_or_default().items)
    }
}

/// Build the docs.360 viewer URL for a file path inside the public folder.
///
/// The path is made relative to the configured base folder and
/// percent-encoded per segment (slashes stay literal, as the viewer
/// expects); the public key is encoded fully.
pub fn build_docs_url(file_path: &str, docs_public_key: &str, base_folder: &str) -> String {
    let base = base_folder.trim_end_matches('/');
    let relative = file_path
        .strip_prefix(base)
        .unwrap_or(file_path)
        .trim_start_matches('/');

    let encoded_key = urlencoding::encode(docs_public_key);
    let encoded_path = relative
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let filename = file_path.rsplit('/').next().unwrap_or(file_path);
    let encoded_name = urlencoding::encode(filename);

    format!(
        "https://docs.360.yandex.ru/docs/view?url=ya-disk-public%3A%2F%2F{encoded_key}%3A%2F{encoded_path}&name={encoded_name}&nosw=1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_docs_url_strips_base_and_encodes() {
        let url = build_docs_url(
            "/docs/01. iOT Systems/Кабель.pdf",
            "AbC+dEf==",
            "/docs",
        );
        assert!(url.starts_with("https://docs.360.yandex.ru/docs/view?url=ya-disk-public%3A%2F%2F"));
        assert!(url.contains("AbC%2BdEf%3D%3D"));
        // Base prefix removed, slashes kept literal between encoded segments.
        assert!(url.contains("01.%20iOT%20Systems/%D0%9A%D0%B0%D0%B1%D0%B5%D0%BB%D1%8C.pdf"));
        assert!(!url.contains("/docs/01."));
        assert!(url.contains("&name=%D0%9A%D0%B0%D0%B1%D0%B5%D0%BB%D1%8C.pdf"));
        assert!(url.ends_with("&nosw=1"));
    }

    #[test]
    fn build_docs_url_tolerates_paths_outside_base() {
        let url = build_docs_url("/elsewhere/a.pdf", "key", "/docs");
        assert!(url.contains("elsewhere/a.pdf"));
    }

    #[test]
    fn resource_item_kind_detection() {
        let dir: ResourceItem =
            serde_json::from_str(r#"{"name": "02. HDL", "type": "dir"}"#).unwrap();
        let file: ResourceItem =
            serde_json::from_str(r#"{"name": "a.pdf", "type": "file"}"#).unwrap();
        assert!(dir.is_dir());
        assert!(!file.is_dir());
    }
}
