use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    error::{ToolError, ToolResult},
    memory::{ConversationMemory, Message},
    tool::{ToolDefinition, ToolRegistry},
};

/// A named conversational agent: model, instructions, tools and short-term memory.
///
/// Choosing which tool to call is left to whatever LLM runtime drives the agent;
/// [`Agent::prompt`] hands it everything it needs and [`Agent::call_tool`] runs
/// the choice.
#[derive(Debug)]
pub struct Agent {
    id: String,
    name: String,
    instructions: String,
    model: String,
    tools: ToolRegistry,
    memory: Mutex<ConversationMemory>,
}

/// Context for one model turn.
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub model: String,
    pub instructions: String,
    pub history: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
        tools: ToolRegistry,
        memory: ConversationMemory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            tools,
            memory: Mutex::new(memory),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    pub fn remember(&self, thread: &str, message: Message) {
        self.memory.lock().push(thread, message);
    }

    pub fn history(&self, thread: &str) -> Vec<Message> {
        self.memory.lock().recent(thread)
    }

    pub fn forget(&self, thread: &str) {
        self.memory.lock().clear(thread);
    }

    pub fn prompt(&self, thread: &str) -> Prompt {
        Prompt {
            model: self.model.clone(),
            instructions: self.instructions.clone(),
            history: self.history(thread),
            tools: self.tool_definitions(),
        }
    }

    /// Run one of this agent's tools and record the exchange in `thread`.
    pub async fn call_tool(&self, thread: &str, tool: &str, args: Value) -> ToolResult<Value> {
        if !self.tools.has_tool(tool) {
            return Err(ToolError::NotFound(tool.to_string()));
        }

        info!(agent = %self.id, tool, thread, "calling tool");

        let result = self.tools.execute(tool, args.clone()).await;

        let record = match &result {
            Ok(output) => json!({ "tool": tool, "args": args, "result": output }),
            Err(err) => {
                warn!(agent = %self.id, tool, error = %err, "tool failed");
                json!({ "tool": tool, "args": args, "error": err.to_string() })
            }
        };
        self.remember(thread, Message::tool(record.to_string()));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        memory::Role,
        tool::{Tool, schema_for},
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Shout;

    #[async_trait]
    impl Tool for Shout {
        fn id(&self) -> &str {
            "shout"
        }

        fn description(&self) -> &str {
            "Upper-case a string"
        }

        fn input_schema(&self) -> Value {
            schema_for::<String>()
        }

        fn output_schema(&self) -> Value {
            schema_for::<String>()
        }

        async fn execute(&self, args: Value) -> ToolResult<Value> {
            match args.as_str() {
                Some(s) => Ok(Value::String(s.to_uppercase())),
                None => Err(anyhow!("expected a string").into()),
            }
        }
    }

    fn agent(last_messages: usize) -> Agent {
        Agent::new(
            "shouter",
            "Shouting Agent",
            "Shout things.",
            "test/model",
            ToolRegistry::new().with(Arc::new(Shout)),
            ConversationMemory::new(last_messages),
        )
    }

    #[tokio::test]
    async fn tool_calls_are_recorded_in_memory() {
        let agent = agent(10);
        agent.remember("t", Message::user("say hi loudly"));

        let out = agent.call_tool("t", "shout", json!("hi")).await.unwrap();
        assert_eq!(out, json!("HI"));

        let history = agent.history("t");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, Role::Tool);

        let record: Value = serde_json::from_str(&history[1].content).unwrap();
        assert_eq!(record["tool"], "shout");
        assert_eq!(record["result"], "HI");
    }

    #[tokio::test]
    async fn failures_are_recorded_and_returned() {
        let agent = agent(10);

        let err = agent.call_tool("t", "shout", json!(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "expected a string");

        let record: Value = serde_json::from_str(&agent.history("t")[0].content).unwrap();
        assert_eq!(record["error"], "expected a string");
    }

    #[tokio::test]
    async fn tools_from_other_agents_are_not_found() {
        let agent = agent(10);

        let err = agent.call_tool("t", "get-weather", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert!(agent.history("t").is_empty());
    }

    #[test]
    fn prompt_bundles_instructions_history_and_tools() {
        let agent = agent(2);
        agent.remember("t", Message::user("one"));
        agent.remember("t", Message::assistant("two"));
        agent.remember("t", Message::user("three"));

        let prompt = agent.prompt("t");
        assert_eq!(prompt.model, "test/model");
        assert_eq!(prompt.instructions, "Shout things.");
        assert_eq!(prompt.history.len(), 2);
        assert_eq!(prompt.history[0].content, "two");
        assert_eq!(prompt.tools.len(), 1);
        assert_eq!(prompt.tools[0].id, "shout");

        agent.forget("t");
        assert!(agent.prompt("t").history.is_empty());
    }
}
