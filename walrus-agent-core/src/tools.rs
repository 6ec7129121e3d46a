//! Concrete tools exposed to the agents.

pub mod walrus;
pub mod weather;

pub use walrus::{WalrusDownloadTool, WalrusUploadTool};
pub use weather::WeatherTool;
