//! Environment substitution and typed accessors over [`Config`].

use std::time::Duration;

use super::types::{Config, ProviderEntry};
use crate::agent::Limits;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        if let Some(ref mut m) = self.model {
            *m = Self::resolve_str(m);
        }
        if let Some(ref mut sp) = self.system_prompt {
            *sp = Self::resolve_str(sp);
        }
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.ollama);
    }

    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value. Unset variables
    /// become empty strings.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    fn entry(&self, provider: &str) -> Option<&ProviderEntry> {
        match provider {
            "anthropic" => self.provider.anthropic.as_ref(),
            "openai" => self.provider.openai.as_ref(),
            "ollama" => self.provider.ollama.as_ref(),
            _ => None,
        }
    }

    /// Resolve API key for a provider: env var first, then config value.
    /// Empty values count as missing.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        self.entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|k| !k.is_empty())
    }

    /// Configured base URL for a provider, if any.
    pub fn base_url(&self, provider: &str) -> Option<&str> {
        self.entry(provider)
            .and_then(|e| e.base_url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Model configured for `provider`: the provider entry's model, then the
    /// top-level `model`. A `provider/model` value naming another provider
    /// does not apply.
    pub fn model_for(&self, provider: &str) -> Option<String> {
        if let Some(model) = self.entry(provider).and_then(|e| e.model.clone()) {
            return Some(model);
        }
        let m = self.model.as_deref().filter(|m| !m.is_empty())?;
        match m.split_once('/') {
            Some((prov, model)) if prov.eq_ignore_ascii_case(provider) => Some(model.to_string()),
            Some(_) => None,
            None => Some(m.to_string()),
        }
    }

    /// System instruction for every model call.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_SYSTEM_PROMPT)
    }

    /// Exchange limits with built-in defaults for unset fields.
    pub fn limits(&self) -> Limits {
        let defaults = Limits::default();
        Limits {
            max_iterations: self.limits.max_iterations.unwrap_or(defaults.max_iterations),
            tool_timeout: self
                .limits
                .tool_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.tool_timeout),
            exchange_timeout: self
                .limits
                .exchange_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.exchange_timeout),
            max_tool_output_chars: self
                .limits
                .max_tool_output_chars
                .unwrap_or(defaults.max_tool_output_chars),
        }
    }

    /// Copy with API keys masked, for display.
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        for entry in [
            &mut config.provider.anthropic,
            &mut config.provider.openai,
            &mut config.provider.ollama,
        ]
        .into_iter()
        .flatten()
        {
            if let Some(key) = entry.api_key.as_mut().filter(|k| !k.is_empty()) {
                *key = "********".to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::LimitsConfig;

    #[test]
    fn test_resolve_str_substitutes_env() {
        std::env::set_var("KILO_TEST_SUBST", "secret");
        assert_eq!(Config::resolve_str("{env:KILO_TEST_SUBST}"), "secret");
        assert_eq!(Config::resolve_str("a-{env:KILO_TEST_SUBST}-b"), "a-secret-b");
        assert_eq!(Config::resolve_str("{env:KILO_TEST_UNSET_VAR}"), "");
        assert_eq!(Config::resolve_str("{env:broken"), "{env:broken");
    }

    #[test]
    fn test_limits_fall_back_to_defaults() {
        let config = Config {
            limits: LimitsConfig {
                max_iterations: Some(2),
                exchange_timeout_secs: Some(10),
                ..LimitsConfig::default()
            },
            ..Config::default()
        };
        let limits = config.limits();
        assert_eq!(limits.max_iterations, 2);
        assert_eq!(limits.exchange_timeout, Duration::from_secs(10));
        assert_eq!(limits.tool_timeout, Limits::default().tool_timeout);
        assert_eq!(limits.max_tool_output_chars, 5000);
    }

    #[test]
    fn test_model_for_prefers_provider_entry() {
        let mut config = Config::default();
        assert_eq!(config.model_for("ollama"), None);

        config.model = Some("openai/gpt-4.1-mini".into());
        assert_eq!(config.model_for("openai").as_deref(), Some("gpt-4.1-mini"));
        assert_eq!(config.model_for("anthropic"), None);

        config.provider.ollama = Some(ProviderEntry {
            model: Some("qwen3".into()),
            ..ProviderEntry::default()
        });
        assert_eq!(config.model_for("ollama").as_deref(), Some("qwen3"));
    }

    #[test]
    fn test_empty_config_key_is_missing() {
        let mut config = Config::default();
        config.provider.ollama = Some(ProviderEntry {
            api_key: Some(String::new()),
            ..ProviderEntry::default()
        });
        assert_eq!(config.resolve_api_key("ollama"), None);
    }

    #[test]
    fn test_redacted_masks_keys() {
        let mut config = Config::default();
        config.provider.anthropic = Some(ProviderEntry {
            api_key: Some("sk-ant-123".into()),
            ..ProviderEntry::default()
        });
        let shown = config.redacted();
        assert_eq!(
            shown.provider.anthropic.unwrap().api_key.as_deref(),
            Some("********")
        );
    }
}
