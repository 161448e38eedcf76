//! Configuration for the session controller and the companion it talks to
//!
//! `ControllerConfig` carries the timing constants. `CompanionProps` are the
//! inputs the host application passes in and can be loaded from a TOML file.

use crate::messages::storage::DEFAULT_CONTEXT_WINDOW;
use crate::{ConversoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Timing and sizing for the call controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Silence timeout in milliseconds
    pub silence_timeout_ms: u64,
    /// Automatic retries after the first failed start, not total attempts
    pub max_retries: u8,
    /// Retry delay multiplier in milliseconds
    pub retry_base_delay_ms: u64,
    /// Number of recent messages forwarded as context
    pub context_window: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            silence_timeout_ms: 3000,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl ControllerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the silence timeout
    pub fn with_silence_timeout_ms(mut self, timeout: u64) -> Self {
        self.silence_timeout_ms = timeout;
        self
    }

    /// Set the retry limit
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the retry delay multiplier
    pub fn with_retry_base_delay_ms(mut self, delay: u64) -> Self {
        self.retry_base_delay_ms = delay;
        self
    }

    /// Set the context window size
    pub fn with_context_window(mut self, size: usize) -> Self {
        self.context_window = size;
        self
    }

    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Component inputs describing the companion and the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionProps {
    /// Companion identity, used as the session history key
    pub companion_id: String,
    pub subject: String,
    pub topic: String,
    /// Companion display name
    pub name: String,
    pub user_name: String,
    /// Reference to the user's avatar image
    #[serde(default)]
    pub user_image: Option<String>,
    /// Conversation style, e.g. "casual" or "formal"
    #[serde(default = "default_style")]
    pub style: String,
    /// Voice identifier, e.g. "male" or "female"
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_style() -> String {
    "casual".to_string()
}

fn default_voice() -> String {
    "female".to_string()
}

impl Default for CompanionProps {
    fn default() -> Self {
        Self {
            companion_id: "demo".to_string(),
            subject: "science".to_string(),
            topic: "How photosynthesis turns light into sugar".to_string(),
            name: "Neura the Brainy Explorer".to_string(),
            user_name: "You".to_string(),
            user_image: None,
            style: default_style(),
            voice: default_voice(),
        }
    }
}

impl CompanionProps {
    /// Parse props from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let props: CompanionProps = toml::from_str(content)
            .map_err(|e| ConversoError::ConfigError(e.to_string()))?;
        props.validate()?;
        Ok(props)
    }

    /// Load props from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConversoError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| ConversoError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Validate the props
    pub fn validate(&self) -> Result<()> {
        if self.companion_id.trim().is_empty() {
            return Err(ConversoError::ConfigError(
                "companion_id must not be empty".to_string(),
            ));
        }
        if self.subject.trim().is_empty() || self.topic.trim().is_empty() {
            return Err(ConversoError::ConfigError(
                "subject and topic are required".to_string(),
            ));
        }
        Ok(())
    }
}
