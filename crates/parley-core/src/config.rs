//! Configuration model.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! yields a usable configuration.

use crate::language::{DetectionPolicy, HIGH_CONFIDENCE, MIN_CONFIDENCE, SupportedLanguage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8790";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the capability gateway is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
        }
    }
}

/// Typing detection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Quiet period after the last keystroke before detecting.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shorter buffers clear the indicator instead of detecting.
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: usize,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f32,
}

impl DetectionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn policy(&self) -> DetectionPolicy {
        DetectionPolicy {
            min_confidence: self.min_confidence,
            high_confidence: self.high_confidence,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_input_chars: default_min_input_chars(),
            min_confidence: default_min_confidence(),
            high_confidence: default_high_confidence(),
        }
    }
}

/// Chat behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Summarize is offered only for longer messages.
    #[serde(default = "default_summarize_min_chars")]
    pub summarize_min_chars: usize,
    #[serde(default = "default_display_locale")]
    pub display_locale: String,
    #[serde(default)]
    pub default_target_language: SupportedLanguage,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            summarize_min_chars: default_summarize_min_chars(),
            display_locale: default_display_locale(),
            default_target_language: SupportedLanguage::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the conversation snapshot location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_file: Option<PathBuf>,
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_input_chars() -> usize {
    3
}

fn default_min_confidence() -> f32 {
    MIN_CONFIDENCE
}

fn default_high_confidence() -> f32 {
    HIGH_CONFIDENCE
}

fn default_summarize_min_chars() -> usize {
    150
}

fn default_display_locale() -> String {
    "en".to_string()
}
