//! Core library for the `walrus-agent` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather provider (Open-Meteo) and the WALRUS blob-store boundary
//! - Schema-typed tools, the agents that own them, and the runtime that hosts the agents
//!
//! It is used by `walrus-agent-cli`, but an LLM runtime can drive [`Runtime`] directly.

pub mod agent;
pub mod agents;
pub mod config;
pub mod error;
mod http;
pub mod memory;
pub mod model;
pub mod runtime;
pub mod storage;
pub mod telemetry;
pub mod tool;
pub mod tools;
pub mod weather;

pub use agent::{Agent, Prompt};
pub use config::Config;
pub use error::{ToolError, ToolResult};
pub use model::{
    DownloadInput, DownloadResult, UploadInput, UploadResult, WeatherInput, WeatherReport,
};
pub use runtime::Runtime;
pub use storage::BlobStore;
pub use tool::{Tool, ToolDefinition, ToolRegistry};
pub use weather::WeatherProvider;
