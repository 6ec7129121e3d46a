use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::{
    http::truncate_body,
    model::{DownloadResult, UploadResult},
};

use super::BlobStore;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const METADATA_HEADERS: &[&str] = &["etag", "last-modified", "cache-control"];

/// Talks to a WALRUS publisher for writes and an aggregator for reads.
#[derive(Debug, Clone)]
pub struct PublisherClient {
    publisher_url: String,
    aggregator_url: String,
    explorer_url: String,
    download_dir: PathBuf,
    http: Client,
}

impl PublisherClient {
    pub fn new(
        publisher_url: String,
        aggregator_url: String,
        explorer_url: String,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            publisher_url: trim_base(publisher_url),
            aggregator_url: trim_base(aggregator_url),
            explorer_url: trim_base(explorer_url),
            download_dir,
            http: Client::new(),
        }
    }

    pub fn blob_url(&self, blob_id: &str) -> String {
        format!("{}/v1/blobs/{}", self.aggregator_url, blob_id)
    }

    fn reshape(&self, response: PublisherResponse) -> UploadResult {
        match response {
            PublisherResponse::NewlyCreated(created) => {
                let object = created.blob_object;
                UploadResult {
                    status: "Newly created".to_string(),
                    blob_url: self.blob_url(&object.blob_id),
                    sui_url: format!("{}/object/{}", self.explorer_url, object.id),
                    sui_ref_type: "Associated Sui Object".to_string(),
                    sui_ref: object.id,
                    end_epoch: object.storage.end_epoch,
                    blob_id: object.blob_id,
                }
            }
            PublisherResponse::AlreadyCertified(certified) => UploadResult {
                status: "Already certified".to_string(),
                blob_url: self.blob_url(&certified.blob_id),
                sui_url: format!("{}/tx/{}", self.explorer_url, certified.event.tx_digest),
                sui_ref_type: "Previous Sui Certified Event".to_string(),
                sui_ref: certified.event.tx_digest,
                end_epoch: certified.end_epoch,
                blob_id: certified.blob_id,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum PublisherResponse {
    NewlyCreated(NewlyCreated),
    AlreadyCertified(AlreadyCertified),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewlyCreated {
    blob_object: BlobObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobObject {
    id: String,
    blob_id: String,
    storage: BlobStorage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobStorage {
    end_epoch: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyCertified {
    blob_id: String,
    event: CertifiedEvent,
    end_epoch: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertifiedEvent {
    tx_digest: String,
}

#[async_trait]
impl BlobStore for PublisherClient {
    async fn upload(&self, path: &Path, epochs: u32, send_to: Option<&str>) -> Result<UploadResult> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        debug!(path = %path.display(), size = bytes.len(), epochs, "storing blob");

        let mut query = vec![("epochs", epochs.to_string())];
        if let Some(address) = send_to {
            query.push(("send_object_to", address.to_string()));
        }

        let res = self
            .http
            .put(format!("{}/v1/blobs", self.publisher_url))
            .query(&query)
            .body(bytes)
            .send()
            .await
            .context("Failed to send request to WALRUS publisher")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WALRUS publisher response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "WALRUS publisher request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: PublisherResponse =
            serde_json::from_str(&body).context("Failed to parse WALRUS publisher JSON")?;

        Ok(self.reshape(parsed))
    }

    async fn download(&self, blob_id: &str, output_path: Option<&Path>) -> Result<DownloadResult> {
        check_blob_id(blob_id)?;
        let url = self.blob_url(blob_id);
        debug!(%url, "reading blob");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to WALRUS aggregator")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "WALRUS aggregator request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let metadata = header_metadata(res.headers());

        let bytes = res.bytes().await.context("Failed to read WALRUS aggregator response body")?;

        let target = match output_path {
            Some(path) => path.to_path_buf(),
            None => self.download_dir.join(blob_id),
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        Ok(DownloadResult {
            file_path: target.display().to_string(),
            blob_id: blob_id.to_string(),
            content_type,
            size: bytes.len() as u64,
            metadata,
        })
    }
}

fn header_metadata(headers: &HeaderMap) -> Option<Value> {
    let map: Map<String, Value> = METADATA_HEADERS
        .iter()
        .filter_map(|name| {
            let value = headers.get(*name)?.to_str().ok()?;
            Some((name.to_string(), Value::String(value.to_string())))
        })
        .collect();

    (!map.is_empty()).then_some(Value::Object(map))
}

/// Blob IDs are URL-safe base64; anything else could escape the download
/// directory or the aggregator path.
fn check_blob_id(blob_id: &str) -> Result<()> {
    let valid = !blob_id.is_empty()
        && blob_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        return Err(anyhow!("Invalid blob ID '{blob_id}'"));
    }
    Ok(())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
