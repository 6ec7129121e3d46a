use thiserror::Error;

/// Failure of a single tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Agent '{0}' not found")]
    UnknownAgent(String),

    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid input for tool '{tool}': {source}")]
    InvalidInput {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
