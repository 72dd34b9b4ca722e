//! File loading and merging for kilo configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{Config, LimitsConfig, ProviderConfig, ProviderEntry};

impl Config {
    /// Loads the global config from `~/.config/kilo/config.toml`.
    ///
    /// If no config file exists, writes one with defaults (including
    /// `{env:VAR}` placeholders for API keys) and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = Self::default_toml();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            tracing::info!(path = %path.display(), "wrote default config");
            return Self::parse(&default_toml, &path);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::parse(&contents, &path)
    }

    /// Look for kilo.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)
                    .with_context(|| format!("Failed to read {:?}", candidate))?;
                return Self::parse(&contents, &candidate).map(Some);
            }
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).with_context(|| format!("Failed to parse config at {:?}", path))
    }

    fn default_toml() -> String {
        format!(
            r#"# model = "anthropic/{}"
# system_prompt = "..."

[provider.anthropic]
api_key = "{{env:ANTHROPIC_API_KEY}}"

[provider.openai]
api_key = "{{env:OPENAI_API_KEY}}"

[provider.ollama]
base_url = "{}"

[limits]
max_iterations = {}
tool_timeout_secs = {}
exchange_timeout_secs = {}
max_tool_output_chars = {}
"#,
            crate::constants::DEFAULT_MODEL,
            crate::constants::OLLAMA_DEFAULT_BASE_URL,
            crate::constants::MAX_AGENT_ITERATIONS,
            crate::constants::TOOL_TIMEOUT_SECS,
            crate::constants::EXCHANGE_TIMEOUT_SECS,
            crate::constants::MAX_TOOL_OUTPUT_CHARS,
        )
    }

    /// Merge project config over global config. Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: project.model.or(global.model),
            default_provider: project.default_provider.or(global.default_provider),
            system_prompt: project.system_prompt.or(global.system_prompt),
            provider: ProviderConfig {
                anthropic: merge_entry(global.provider.anthropic, project.provider.anthropic),
                openai: merge_entry(global.provider.openai, project.provider.openai),
                ollama: merge_entry(global.provider.ollama, project.provider.ollama),
            },
            limits: LimitsConfig {
                max_iterations: project.limits.max_iterations.or(global.limits.max_iterations),
                tool_timeout_secs: project
                    .limits
                    .tool_timeout_secs
                    .or(global.limits.tool_timeout_secs),
                exchange_timeout_secs: project
                    .limits
                    .exchange_timeout_secs
                    .or(global.limits.exchange_timeout_secs),
                max_tool_output_chars: project
                    .limits
                    .max_tool_output_chars
                    .or(global.limits.max_tool_output_chars),
            },
        }
    }
}

fn merge_entry(
    global: Option<ProviderEntry>,
    project: Option<ProviderEntry>,
) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
            base_url: p.base_url.or(g.base_url),
            model: p.model.or(g.model),
        }),
        (g, p) => p.or(g),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_parses() {
        let config = Config::parse(&Config::default_toml(), Path::new("config.toml")).unwrap();
        assert_eq!(config.model, None);
        assert_eq!(config.system_prompt, None);
        assert_eq!(config.limits.max_iterations, Some(5));
        assert_eq!(config.limits.max_tool_output_chars, Some(5000));
        assert_eq!(
            config.provider.anthropic.unwrap().api_key.as_deref(),
            Some("{env:ANTHROPIC_API_KEY}")
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("", Path::new("kilo.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Config::parse("model = [", Path::new("kilo.toml")).unwrap_err();
        assert!(err.to_string().contains("kilo.toml"));
    }

    #[test]
    fn test_merge_project_wins() {
        let global = Config::parse(
            r#"
default_provider = "anthropic"
[provider.ollama]
base_url = "http://gpu-box:11434"
model = "llama3"
[limits]
max_iterations = 5
tool_timeout_secs = 30
"#,
            Path::new("global"),
        )
        .unwrap();
        let project = Config::parse(
            r#"
default_provider = "ollama"
[provider.ollama]
model = "qwen3"
[limits]
max_iterations = 2
"#,
            Path::new("project"),
        )
        .unwrap();

        let merged = Config::merge(global, project);
        assert_eq!(merged.default_provider.as_deref(), Some("ollama"));
        let ollama = merged.provider.ollama.unwrap();
        assert_eq!(ollama.model.as_deref(), Some("qwen3"));
        assert_eq!(ollama.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(merged.limits.max_iterations, Some(2));
        assert_eq!(merged.limits.tool_timeout_secs, Some(30));
    }

    #[test]
    fn test_merge_keeps_global_system_prompt() {
        let global = Config::parse(
            r#"system_prompt = "You are X""#,
            Path::new("global"),
        )
        .unwrap();
        let project = Config::parse(
            "[limits]\nmax_iterations = 2\n",
            Path::new("project"),
        )
        .unwrap();

        let merged = Config::merge(global, project);
        assert_eq!(merged.system_prompt.as_deref(), Some("You are X"));
        assert_eq!(merged.system_prompt(), "You are X");
        assert_eq!(merged.limits.max_iterations, Some(2));
    }

    #[test]
    fn test_merge_project_sets_default_model_explicitly() {
        let global = Config::parse(r#"model = "openai/gpt-4.1""#, Path::new("global")).unwrap();
        let project = Config::parse(
            &format!(r#"model = "{}""#, crate::constants::DEFAULT_MODEL),
            Path::new("project"),
        )
        .unwrap();

        let merged = Config::merge(global.clone(), project);
        assert_eq!(merged.model.as_deref(), Some(crate::constants::DEFAULT_MODEL));

        let unset = Config::parse("", Path::new("project")).unwrap();
        assert_eq!(Config::merge(global, unset).model.as_deref(), Some("openai/gpt-4.1"));
    }
}
