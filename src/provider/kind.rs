//! Provider kind enumeration and default model mapping.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};

/// Identifies which LLM backend a [`Provider`](super::Provider) talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic (Claude models).
    Anthropic,
    /// OpenAI.
    OpenAI,
    /// Ollama (local models via the OpenAI-compatible API).
    Ollama,
}

impl ProviderKind {
    /// Lowercase name used in config sections and `<NAME>_API_KEY`.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: anthropic, openai, ollama"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the default model identifier for a given provider.
pub fn default_model_for(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Anthropic => crate::constants::DEFAULT_MODEL,
        ProviderKind::OpenAI => crate::constants::DEFAULT_OPENAI_MODEL,
        ProviderKind::Ollama => crate::constants::OLLAMA_DEFAULT_MODEL,
    }
}
