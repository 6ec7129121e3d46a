use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments accepted by the weather tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WeatherInput {
    /// City name
    pub location: String,
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub conditions: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadInput {
    /// Path to file to upload
    pub file_path: String,
    /// Storage duration in epochs
    pub num_epochs: u32,
    /// Optional: Address to send object to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_to: Option<String>,
}

/// Outcome of storing a blob, as reported by the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub status: String,
    pub blob_id: String,
    pub end_epoch: u64,
    pub blob_url: String,
    pub sui_url: String,
    pub sui_ref_type: String,
    pub sui_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInput {
    /// ID of the WALRUS blob to download
    pub blob_id: String,
    /// Optional: Path where to save the downloaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    pub file_path: String,
    pub blob_id: String,
    pub content_type: String,
    pub size: u64,
    pub metadata: Option<serde_json::Value>,
}
