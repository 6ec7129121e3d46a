//! Tool contract shared by every agent.
//!
//! A tool publishes JSON Schemas for its input and output (generated from the
//! typed models) and executes against raw JSON arguments. Arguments are
//! validated by deserializing them into the tool's input type; the tool body
//! never sees malformed input.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};

use crate::error::{ToolError, ToolResult};

#[async_trait]
pub trait Tool: Send + Sync {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    fn output_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> ToolResult<Value>;
}

/// What an LLM runtime needs to offer a tool to a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub id: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

/// JSON Schema for `T` as a plain JSON value.
pub fn schema_for<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}

/// Validate raw arguments against a tool's typed input.
pub fn parse_input<T: DeserializeOwned>(tool: &str, args: Value) -> ToolResult<T> {
    serde_json::from_value(args)
        .map_err(|source| ToolError::InvalidInput { tool: tool.to_string(), source })
}

pub fn to_output<T: Serialize>(output: &T) -> ToolResult<Value> {
    serde_json::to_value(output).map_err(|e| ToolError::Execution(e.into()))
}

#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.id().to_string(), tool);
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(id)
    }

    pub fn has_tool(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    pub fn tool_ids(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                id: tool.id().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
                output_schema: tool.output_schema(),
            })
            .collect()
    }

    pub async fn execute(&self, id: &str, args: Value) -> ToolResult<Value> {
        let tool = self.get(id).ok_or_else(|| ToolError::NotFound(id.to_string()))?;
        tool.execute(args).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}
