//! The two built-in agents.

use std::sync::Arc;

use crate::{
    agent::Agent,
    config::AgentsConfig,
    memory::ConversationMemory,
    storage::BlobStore,
    tool::ToolRegistry,
    tools::{WalrusDownloadTool, WalrusUploadTool, WeatherTool},
    weather::WeatherProvider,
};

pub const WEATHER_AGENT_ID: &str = "weather";
pub const WALRUS_AGENT_ID: &str = "walrus";

const WEATHER_INSTRUCTIONS: &str = "\
You are a helpful weather assistant that provides accurate weather information.

Your primary function is to help users get weather details for specific locations. When responding:
- Always ask for a location if none is provided
- If the location name isn't in English, translate it
- If a location has multiple parts (e.g. \"New York, NY\"), use the most relevant part (e.g. \"New York\")
- Include relevant details like humidity, wind conditions, and precipitation
- Keep responses concise but informative

Use the get-weather tool to fetch current weather data.";

const WALRUS_INSTRUCTIONS: &str = "\
You are a helpful assistant for managing decentralized file storage using WALRUS.

Your primary functions are:
- Help users upload files to WALRUS decentralized storage
- Help users download files from WALRUS storage
- Provide clear information about the uploaded/downloaded files
- Explain the storage process and relevant details in simple terms

When handling uploads:
- Always ask for the file path if not provided
- Explain what storage epochs mean (each epoch is approximately 24 hours)
- Recommend a reasonable number of epochs based on file type and size
- Return the blobId, which is needed for later downloads

When handling downloads:
- Always ask for the blobId if not provided
- Suggest a reasonable file path for saving the downloaded content
- Provide information about the downloaded file type and size

Keep responses helpful, accurate and focused on WALRUS functionality.";

pub fn weather_agent(provider: Arc<dyn WeatherProvider>, settings: &AgentsConfig) -> Agent {
    Agent::new(
        WEATHER_AGENT_ID,
        "Weather Agent",
        WEATHER_INSTRUCTIONS,
        settings.model.clone(),
        ToolRegistry::new().with(Arc::new(WeatherTool::new(provider))),
        ConversationMemory::new(settings.last_messages),
    )
}

pub fn walrus_agent(store: Arc<dyn BlobStore>, settings: &AgentsConfig) -> Agent {
    Agent::new(
        WALRUS_AGENT_ID,
        "WALRUS Storage Agent",
        WALRUS_INSTRUCTIONS,
        settings.model.clone(),
        ToolRegistry::new()
            .with(Arc::new(WalrusUploadTool::new(store.clone())))
            .with(Arc::new(WalrusDownloadTool::new(store))),
        ConversationMemory::new(settings.last_messages),
    )
}
