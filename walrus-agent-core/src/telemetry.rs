use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

/// One tool invocation as seen by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEvent {
    pub agent: String,
    pub tool: String,
    pub thread: String,
    pub ok: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub at: DateTime<Utc>,
}

pub trait TelemetryStore: Send + Sync + Debug {
    fn record(&self, event: ToolEvent) -> Result<()>;
    fn events(&self) -> Result<Vec<ToolEvent>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTelemetry {
    events: Mutex<Vec<ToolEvent>>,
}

impl InMemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetryStore for InMemoryTelemetry {
    fn record(&self, event: ToolEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }

    fn events(&self) -> Result<Vec<ToolEvent>> {
        Ok(self.events.lock().clone())
    }
}

/// Appends one JSON object per line.
#[derive(Debug)]
pub struct JsonlTelemetry {
    path: PathBuf,
    // Serializes appends from concurrent invocations.
    write_lock: Mutex<()>,
}

impl JsonlTelemetry {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create telemetry directory: {}", parent.display())
            })?;
        }
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetryStore for JsonlTelemetry {
    fn record(&self, event: ToolEvent) -> Result<()> {
        let line = serde_json::to_string(&event).context("Failed to serialize tool event")?;

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open telemetry file: {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to write telemetry file: {}", self.path.display()))?;

        Ok(())
    }

    fn events(&self) -> Result<Vec<ToolEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)
            .with_context(|| format!("Failed to open telemetry file: {}", self.path.display()))?;

        BufReader::new(file)
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|line| {
                let line = line.context("Failed to read telemetry file")?;
                serde_json::from_str(&line).context("Failed to parse tool event")
            })
            .collect()
    }
}
