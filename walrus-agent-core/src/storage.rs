use crate::{
    Config, DownloadResult, UploadResult, storage::publisher::PublisherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, path::Path};

pub mod publisher;

/// Boundary to the WALRUS blob store.
///
/// Encoding, certification and epoch accounting all live behind this trait;
/// callers only see the reshaped results.
#[async_trait]
pub trait BlobStore: Send + Sync + Debug {
    /// Store the file at `path` for `epochs` epochs, optionally transferring
    /// the resulting blob object to `send_to`.
    async fn upload(
        &self,
        path: &Path,
        epochs: u32,
        send_to: Option<&str>,
    ) -> anyhow::Result<UploadResult>;

    /// Fetch `blob_id` and write it to `output_path`, or to a store-chosen
    /// location when absent.
    async fn download(
        &self,
        blob_id: &str,
        output_path: Option<&Path>,
    ) -> anyhow::Result<DownloadResult>;
}

/// Construct the HTTP publisher/aggregator client from the `[walrus]` section.
pub fn store_from_config(config: &Config) -> PublisherClient {
    let walrus = &config.walrus;
    PublisherClient::new(
        walrus.publisher_url.clone(),
        walrus.aggregator_url.clone(),
        walrus.explorer_url.clone(),
        walrus.download_dir.clone(),
    )
}
