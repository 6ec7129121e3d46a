use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc, time::Instant};
use tracing::warn;

use crate::{
    Config,
    agent::Agent,
    agents::{walrus_agent, weather_agent},
    error::{ToolError, ToolResult},
    storage::{BlobStore, store_from_config},
    telemetry::{InMemoryTelemetry, JsonlTelemetry, TelemetryStore, ToolEvent},
    weather::{WeatherProvider, provider_from_config},
};

/// Holds the registered agents and the telemetry backend.
#[derive(Debug)]
pub struct Runtime {
    agents: BTreeMap<String, Agent>,
    telemetry: Arc<dyn TelemetryStore>,
}

#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    agents: Vec<Agent>,
    telemetry: Option<Arc<dyn TelemetryStore>>,
}

impl RuntimeBuilder {
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn telemetry(mut self, store: Arc<dyn TelemetryStore>) -> Self {
        self.telemetry = Some(store);
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            agents: self.agents.into_iter().map(|a| (a.id().to_string(), a)).collect(),
            telemetry: self.telemetry.unwrap_or_else(|| Arc::new(InMemoryTelemetry::new())),
        }
    }
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Both built-in agents wired to the configured Open-Meteo and WALRUS endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Arc<dyn WeatherProvider> = Arc::new(provider_from_config(config));
        let store: Arc<dyn BlobStore> = Arc::new(store_from_config(config));
        Self::with_clients(config, provider, store)
    }

    pub fn with_clients(
        config: &Config,
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn BlobStore>,
    ) -> Result<Self> {
        let telemetry: Arc<dyn TelemetryStore> = match &config.telemetry.path {
            Some(path) => Arc::new(JsonlTelemetry::open(path)?),
            None => Arc::new(InMemoryTelemetry::new()),
        };

        Ok(Self::builder()
            .agent(weather_agent(provider, &config.agents))
            .agent(walrus_agent(store, &config.agents))
            .telemetry(telemetry)
            .build())
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn telemetry(&self) -> &Arc<dyn TelemetryStore> {
        &self.telemetry
    }

    /// Run `tool` on behalf of `agent` in conversation `thread`.
    pub async fn invoke(
        &self,
        agent: &str,
        thread: &str,
        tool: &str,
        args: Value,
    ) -> ToolResult<Value> {
        let target = self.agent(agent).ok_or_else(|| ToolError::UnknownAgent(agent.to_string()))?;

        let started = Instant::now();
        let result = target.call_tool(thread, tool, args).await;

        let event = ToolEvent {
            agent: agent.to_string(),
            tool: tool.to_string(),
            thread: thread.to_string(),
            ok: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            at: Utc::now(),
        };
        if let Err(err) = self.telemetry.record(event) {
            warn!(error = %err, "failed to record tool event");
        }

        result
    }
}
