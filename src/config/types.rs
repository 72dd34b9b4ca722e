//! Struct definitions and serde defaults for kilo configuration.

use serde::{Deserialize, Serialize};

/// Root configuration, deserialized from `config.toml`.
///
/// Every field has a serde default so kilo runs without a config file.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Default model, plain or `provider/model` (e.g. `"ollama/qwen3"`).
    #[serde(default)]
    pub model: Option<String>,
    /// Default provider name (e.g. "anthropic", "ollama").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// System instruction sent with every model call.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Exchange bounds.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Provider-specific configuration map. Only configured providers are `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    pub anthropic: Option<ProviderEntry>,
    pub openai: Option<ProviderEntry>,
    pub ollama: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderEntry {
    /// API key. `<PROVIDER>_API_KEY` in the environment takes precedence.
    pub api_key: Option<String>,
    /// Custom base URL (proxies, self-hosted Ollama).
    pub base_url: Option<String>,
    /// Model to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// `[limits]` section. Unset fields fall back to the built-in defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Maximum model→tools cycles per exchange.
    pub max_iterations: Option<usize>,
    /// Per tool invocation.
    pub tool_timeout_secs: Option<u64>,
    /// Whole exchange, model calls and tools included.
    pub exchange_timeout_secs: Option<u64>,
    /// Tool output cap in characters before truncation.
    pub max_tool_output_chars: Option<usize>,
}
