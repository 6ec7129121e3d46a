use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::ToolResult,
    model::{WeatherInput, WeatherReport},
    tool::{Tool, parse_input, schema_for, to_output},
    weather::WeatherProvider,
};

pub const WEATHER_TOOL_ID: &str = "get-weather";

#[derive(Debug, Clone)]
pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn id(&self) -> &str {
        WEATHER_TOOL_ID
    }

    fn description(&self) -> &str {
        "Get current weather for a location"
    }

    fn input_schema(&self) -> Value {
        schema_for::<WeatherInput>()
    }

    fn output_schema(&self) -> Value {
        schema_for::<WeatherReport>()
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let input: WeatherInput = parse_input(self.id(), args)?;
        let report = self.provider.get_weather(&input.location).await?;
        to_output(&report)
    }
}
