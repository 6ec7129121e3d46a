use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), at: Utc::now() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }
}

/// Short-term memory: the last `last_messages` messages of each thread.
///
/// Each buffer is bounded, the set of threads is not. A thread id stays
/// until [`clear`](Self::clear) drops it, so long-lived callers that mint a
/// thread per request must clear finished ones themselves.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    last_messages: usize,
    threads: HashMap<String, VecDeque<Message>>,
}

impl ConversationMemory {
    pub fn new(last_messages: usize) -> Self {
        Self { last_messages, threads: HashMap::new() }
    }

    pub fn capacity(&self) -> usize {
        self.last_messages
    }

    pub fn push(&mut self, thread: &str, message: Message) {
        if self.last_messages == 0 {
            return;
        }

        let buffer = self.threads.entry(thread.to_string()).or_default();
        while buffer.len() >= self.last_messages {
            buffer.pop_front();
        }
        buffer.push_back(message);
    }

    /// Oldest first.
    pub fn recent(&self, thread: &str) -> Vec<Message> {
        self.threads
            .get(thread)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self, thread: &str) {
        self.threads.remove(thread);
    }

    pub fn threads(&self) -> impl Iterator<Item = &str> {
        self.threads.keys().map(String::as_str)
    }
}
