use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::info;
use walrus_agent_core::{
    Config, DownloadResult, Runtime, UploadResult, WeatherReport,
    agents::{WALRUS_AGENT_ID, WEATHER_AGENT_ID},
    tools::{
        walrus::{DOWNLOAD_TOOL_ID, UPLOAD_TOOL_ID},
        weather::WEATHER_TOOL_ID,
    },
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "walrus-agent", version, about = "Weather and WALRUS storage agents")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Conversation thread the calls are recorded under.
    #[arg(long, global = true, default_value = "cli")]
    pub thread: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set endpoints and agent settings.
    Configure,

    /// List agents and their tools.
    Agents,

    /// Print the tool definitions (with JSON Schemas) of an agent.
    Schema {
        /// Agent id, e.g. "weather" or "walrus".
        agent: String,
    },

    /// Show current weather for a location.
    Weather {
        /// City name.
        location: String,
    },

    /// Upload a file to WALRUS.
    Upload {
        file: String,

        /// Storage duration in epochs (~24h each).
        #[arg(long, default_value_t = 1)]
        epochs: u32,

        /// Address to send the blob object to.
        #[arg(long)]
        send_to: Option<String>,
    },

    /// Download a blob from WALRUS.
    Download {
        blob_id: String,

        /// Where to save the blob; defaults to the configured download dir.
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Call any tool with raw JSON arguments.
    Call {
        agent: String,
        tool: String,
        /// JSON object, e.g. '{"location":"Berlin"}'.
        args: String,
    },
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let runtime = || Runtime::from_config(&config);
        let thread = self.thread.as_str();

        match self.command {
            Command::Configure => configure(self.config.as_deref(), &config)?,
            Command::Agents => {
                for agent in runtime()?.agents() {
                    println!("{} ({}), model {}", agent.name(), agent.id(), agent.model());
                    for def in agent.tool_definitions() {
                        println!("  {:<16} {}", def.id, def.description);
                    }
                }
            }
            Command::Schema { agent } => {
                let runtime = runtime()?;
                let agent = runtime
                    .agent(&agent)
                    .with_context(|| format!("Unknown agent '{agent}'"))?;
                println!("{}", serde_json::to_string_pretty(&agent.tool_definitions())?);
            }
            Command::Weather { location } => {
                let out = runtime()?
                    .invoke(WEATHER_AGENT_ID, thread, WEATHER_TOOL_ID, json!({ "location": location }))
                    .await?;
                print_weather(&serde_json::from_value::<WeatherReport>(out)?);
            }
            Command::Upload { file, epochs, send_to } => {
                let args = json!({ "filePath": file, "numEpochs": epochs, "sendTo": send_to });
                let out = runtime()?.invoke(WALRUS_AGENT_ID, thread, UPLOAD_TOOL_ID, args).await?;
                print_upload(&serde_json::from_value::<UploadResult>(out)?);
            }
            Command::Download { blob_id, output } => {
                let args = json!({ "blobId": blob_id, "outputPath": output });
                let out = runtime()?.invoke(WALRUS_AGENT_ID, thread, DOWNLOAD_TOOL_ID, args).await?;
                print_download(&serde_json::from_value::<DownloadResult>(out)?);
            }
            Command::Call { agent, tool, args } => {
                let args: Value =
                    serde_json::from_str(&args).context("Tool arguments must be valid JSON")?;
                let out = runtime()?.invoke(&agent, thread, &tool, args).await?;
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
        }

        Ok(())
    }
}

/// Prompt for every setting, starting from `current`, and save the result.
fn configure(config_path: Option<&Path>, current: &Config) -> anyhow::Result<()> {
    let mut config = current.clone();
    config.walrus.publisher_url = Text::new("WALRUS publisher URL:")
        .with_default(&config.walrus.publisher_url)
        .prompt()?;
    config.walrus.aggregator_url = Text::new("WALRUS aggregator URL:")
        .with_default(&config.walrus.aggregator_url)
        .prompt()?;
    config.walrus.explorer_url = Text::new("Sui explorer URL:")
        .with_default(&config.walrus.explorer_url)
        .prompt()?;

    let download_dir = config.walrus.download_dir.display().to_string();
    config.walrus.download_dir = Text::new("Download directory:")
        .with_default(&download_dir)
        .prompt()?
        .into();

    config.agents.model = Text::new("Agent model:").with_default(&config.agents.model).prompt()?;
    config.agents.last_messages = CustomType::<usize>::new("Messages kept per thread:")
        .with_default(config.agents.last_messages)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let persist = Confirm::new("Write tool telemetry to a file?")
        .with_default(config.telemetry.path.is_some())
        .prompt()?;
    config.telemetry.path = if persist {
        let telemetry_file = config
            .telemetry
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "walrus-agent-events.jsonl".to_string());
        Some(Text::new("Telemetry file:").with_default(&telemetry_file).prompt()?.into())
    } else {
        None
    };

    let path = match config_path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn print_weather(report: &WeatherReport) {
    println!("Weather in {}", report.location);
    println!("  Conditions:  {}", report.conditions);
    println!("  Temperature: {:.1}°C (feels like {:.1}°C)", report.temperature, report.feels_like);
    println!("  Humidity:    {:.0}%", report.humidity);
    println!("  Wind:        {:.1} km/h, gusts {:.1} km/h", report.wind_speed, report.wind_gust);
}

fn print_upload(result: &UploadResult) {
    println!("{}", result.status);
    println!("  Blob ID:    {}", result.blob_id);
    println!("  End epoch:  {}", result.end_epoch);
    println!("  Blob URL:   {}", result.blob_url);
    println!("  {}: {}", result.sui_ref_type, result.sui_ref);
    println!("  Explorer:   {}", result.sui_url);
}

fn print_download(result: &DownloadResult) {
    println!("Saved blob {} to {}", result.blob_id, result.file_path);
    println!("  Content type: {}", result.content_type);
    println!("  Size:         {} bytes", result.size);
    if let Some(metadata) = &result.metadata {
        println!("  Metadata:     {metadata}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_defaults_to_one_epoch() {
        let cli = Cli::parse_from(["walrus-agent", "upload", "photo.jpg"]);

        match cli.command {
            Command::Upload { file, epochs, send_to } => {
                assert_eq!(file, "photo.jpg");
                assert_eq!(epochs, 1);
                assert!(send_to.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.thread, "cli");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "walrus-agent",
            "download",
            "blob-1",
            "-o",
            "out.bin",
            "--config",
            "/tmp/c.toml",
            "--thread",
            "t9",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.thread, "t9");
        assert!(matches!(cli.command, Command::Download { ref output, .. } if output.as_deref() == Some("out.bin")));
    }

    #[tokio::test]
    async fn listing_agents_builds_the_runtime_on_demand() {
        let cli = Cli::parse_from(["walrus-agent", "agents"]);

        assert!(cli.run(Config::default()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_agent_schema_is_an_error() {
        let cli = Cli::parse_from(["walrus-agent", "schema", "finance"]);

        let err = cli.run(Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("Unknown agent 'finance'"));
    }
}
