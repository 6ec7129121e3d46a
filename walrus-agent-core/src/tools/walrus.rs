use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::{path::Path, sync::Arc};
use tokio::fs;

use crate::{
    error::ToolResult,
    model::{DownloadInput, DownloadResult, UploadInput, UploadResult},
    storage::BlobStore,
    tool::{Tool, parse_input, schema_for, to_output},
};

pub const UPLOAD_TOOL_ID: &str = "walrus-upload";
pub const DOWNLOAD_TOOL_ID: &str = "walrus-download";

#[derive(Debug, Clone)]
pub struct WalrusUploadTool {
    store: Arc<dyn BlobStore>,
}

impl WalrusUploadTool {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for WalrusUploadTool {
    fn id(&self) -> &str {
        UPLOAD_TOOL_ID
    }

    fn description(&self) -> &str {
        "Upload a file to WALRUS decentralized storage"
    }

    fn input_schema(&self) -> Value {
        schema_for::<UploadInput>()
    }

    fn output_schema(&self) -> Value {
        schema_for::<UploadResult>()
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let input: UploadInput = parse_input(self.id(), args)?;
        let path = Path::new(&input.file_path);

        // Checked up front so a bad path never reaches the store.
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(anyhow!("File not found: {}", input.file_path).into());
        }
        if input.num_epochs == 0 {
            return Err(anyhow!("numEpochs must be at least 1").into());
        }

        let result = self
            .store
            .upload(path, input.num_epochs, input.send_to.as_deref())
            .await
            .map_err(|e| anyhow!("Error uploading file: {e:#}"))?;

        to_output(&result)
    }
}

#[derive(Debug, Clone)]
pub struct WalrusDownloadTool {
    store: Arc<dyn BlobStore>,
}

impl WalrusDownloadTool {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for WalrusDownloadTool {
    fn id(&self) -> &str {
        DOWNLOAD_TOOL_ID
    }

    fn description(&self) -> &str {
        "Download a file from WALRUS decentralized storage"
    }

    fn input_schema(&self) -> Value {
        schema_for::<DownloadInput>()
    }

    fn output_schema(&self) -> Value {
        schema_for::<DownloadResult>()
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let input: DownloadInput = parse_input(self.id(), args)?;

        let result = self
            .store
            .download(&input.blob_id, input.output_path.as_deref().map(Path::new))
            .await
            .map_err(|e| anyhow!("Error downloading file: {e:#}"))?;

        to_output(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records every call and answers with canned results.
    #[derive(Debug, Default)]
    struct RecordingStore {
        uploads: Mutex<Vec<(PathBuf, u32, Option<String>)>>,
        downloads: Mutex<Vec<(String, Option<PathBuf>)>>,
        fail: bool,
    }

    #[async_trait]
    impl BlobStore for RecordingStore {
        async fn upload(
            &self,
            path: &Path,
            epochs: u32,
            send_to: Option<&str>,
        ) -> anyhow::Result<UploadResult> {
            self.uploads.lock().push((path.to_path_buf(), epochs, send_to.map(str::to_string)));
            if self.fail {
                return Err(anyhow!("publisher unreachable"));
            }
            Ok(UploadResult {
                status: "Newly created".to_string(),
                blob_id: "Cmh2LQEGJwBYfmIC8duzK8FUE2UipCCrshAYjiUheZM".to_string(),
                end_epoch: 120,
                blob_url: "https://aggregator/v1/blobs/Cmh2LQEGJwBYfmIC8duzK8FUE2UipCCrshAYjiUheZM"
                    .to_string(),
                sui_url: "https://explorer/object/0x1".to_string(),
                sui_ref_type: "Associated Sui Object".to_string(),
                sui_ref: "0x1".to_string(),
            })
        }

        async fn download(
            &self,
            blob_id: &str,
            output_path: Option<&Path>,
        ) -> anyhow::Result<DownloadResult> {
            self.downloads.lock().push((blob_id.to_string(), output_path.map(Path::to_path_buf)));
            if self.fail {
                return Err(anyhow!("aggregator returned 404"));
            }
            Ok(DownloadResult {
                file_path: output_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| format!("downloads/{blob_id}")),
                blob_id: blob_id.to_string(),
                content_type: "text/plain".to_string(),
                size: 11,
                metadata: None,
            })
        }
    }

    fn temp_file() -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello world").unwrap();
        let path = path.display().to_string();
        (dir, path)
    }

    #[tokio::test]
    async fn missing_file_fails_before_store_is_called() {
        let store = Arc::new(RecordingStore::default());
        let tool = WalrusUploadTool::new(store.clone());

        let err = tool
            .execute(json!({ "filePath": "/definitely/not/here.txt", "numEpochs": 3 }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "File not found: /definitely/not/here.txt");
        assert!(store.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn upload_echoes_blob_id_unmodified() {
        let (_dir, path) = temp_file();
        let store = Arc::new(RecordingStore::default());
        let tool = WalrusUploadTool::new(store.clone());

        let out = tool
            .execute(json!({ "filePath": path, "numEpochs": 3, "sendTo": "0xfeed" }))
            .await
            .unwrap();

        assert_eq!(out["blobId"], "Cmh2LQEGJwBYfmIC8duzK8FUE2UipCCrshAYjiUheZM");
        assert_eq!(out["endEpoch"], 120);
        assert_eq!(out["suiRefType"], "Associated Sui Object");

        let uploads = store.uploads.lock();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].1, 3);
        assert_eq!(uploads[0].2.as_deref(), Some("0xfeed"));
    }

    #[tokio::test]
    async fn zero_epochs_is_rejected() {
        let (_dir, path) = temp_file();
        let store = Arc::new(RecordingStore::default());
        let tool = WalrusUploadTool::new(store.clone());

        let err = tool.execute(json!({ "filePath": path, "numEpochs": 0 })).await.unwrap_err();

        assert!(err.to_string().contains("numEpochs"));
        assert!(store.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_wrapped() {
        let (_dir, path) = temp_file();
        let store = Arc::new(RecordingStore { fail: true, ..Default::default() });
        let tool = WalrusUploadTool::new(store);

        let err = tool.execute(json!({ "filePath": path, "numEpochs": 1 })).await.unwrap_err();

        assert!(matches!(err, ToolError::Execution(_)));
        assert_eq!(err.to_string(), "Error uploading file: publisher unreachable");
    }

    #[tokio::test]
    async fn negative_epochs_fail_validation() {
        let tool = WalrusUploadTool::new(Arc::new(RecordingStore::default()));

        let err = tool.execute(json!({ "filePath": "x", "numEpochs": -1 })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn download_passes_optional_output_path() {
        let store = Arc::new(RecordingStore::default());
        let tool = WalrusDownloadTool::new(store.clone());

        let out = tool.execute(json!({ "blobId": "blob-1" })).await.unwrap();
        assert_eq!(out["filePath"], "downloads/blob-1");
        assert_eq!(out["metadata"], Value::Null);

        let out = tool
            .execute(json!({ "blobId": "blob-2", "outputPath": "/tmp/out.txt" }))
            .await
            .unwrap();
        assert_eq!(out["filePath"], "/tmp/out.txt");
        assert_eq!(out["contentType"], "text/plain");

        let downloads = store.downloads.lock();
        assert_eq!(downloads[0], ("blob-1".to_string(), None));
        assert_eq!(downloads[1], ("blob-2".to_string(), Some(PathBuf::from("/tmp/out.txt"))));
    }

    #[tokio::test]
    async fn download_failure_is_wrapped() {
        let store = Arc::new(RecordingStore { fail: true, ..Default::default() });
        let tool = WalrusDownloadTool::new(store);

        let err = tool.execute(json!({ "blobId": "gone" })).await.unwrap_err();
        assert_eq!(err.to_string(), "Error downloading file: aggregator returned 404");
    }

    #[test]
    fn upload_schema_marks_send_to_optional() {
        let tool = WalrusUploadTool::new(Arc::new(RecordingStore::default()));
        let schema = tool.input_schema();

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"filePath"));
        assert!(required.contains(&"numEpochs"));
        assert!(!required.contains(&"sendTo"));
    }
}
