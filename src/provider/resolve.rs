//! Picks the provider and model for a session.
//!
//! Priority: CLI flags, then config, then built-in defaults. `--model`
//! accepts `provider/model` shorthand when `--provider` is omitted.

use anyhow::Result;

use super::kind::{default_model_for, ProviderKind};
use crate::config::Config;
use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolves which provider and model to use.
///
/// ```text
/// --model anthropic/claude-sonnet-4-5   shorthand, only without --provider
/// --provider ollama --model qwen3       explicit pair
/// --provider openai                     provider default model
/// (nothing)                             config, then DEFAULT_PROVIDER
/// ```
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((prov, model)) = cli_model.and_then(|m| m.split_once('/')) {
            return Ok(ModelSelection {
                provider: prov.parse()?,
                model: model.to_string(),
            });
        }
    }

    let provider: ProviderKind = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER)
        .parse()?;

    let model = cli_model
        .map(String::from)
        .or_else(|| config.model_for(provider.name()))
        .unwrap_or_else(|| default_model_for(provider).to_string());

    Ok(ModelSelection { provider, model })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sel = resolve_model(None, None, &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::Anthropic);
        assert_eq!(sel.model, crate::constants::DEFAULT_MODEL);
    }

    #[test]
    fn test_shorthand() {
        let sel = resolve_model(None, Some("ollama/qwen3:8b"), &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::Ollama);
        assert_eq!(sel.model, "qwen3:8b");
    }

    #[test]
    fn test_explicit_provider_keeps_slash_in_model() {
        let sel = resolve_model(Some("openai"), Some("org/model"), &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenAI);
        assert_eq!(sel.model, "org/model");
    }

    #[test]
    fn test_provider_default_model() {
        let sel = resolve_model(Some("openai"), None, &Config::default()).unwrap();
        assert_eq!(sel.model, crate::constants::DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_config_provider() {
        let config = Config {
            default_provider: Some("ollama".into()),
            ..Config::default()
        };
        let sel = resolve_model(None, None, &config).unwrap();
        assert_eq!(sel.provider, ProviderKind::Ollama);
        assert_eq!(sel.model, crate::constants::OLLAMA_DEFAULT_MODEL);
    }

    #[test]
    fn test_unknown_provider() {
        assert!(resolve_model(Some("nope"), None, &Config::default()).is_err());
    }
}
