//! rig-core backed [`ModelGateway`] implementation.
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch. Supports Anthropic, OpenAI and Ollama.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::Message as RigMessage;
use rig::providers::{anthropic, openai};

use super::convert;
use super::kind::ProviderKind;
use super::resolve::ModelSelection;
use crate::config::Config;
use crate::gateway::{GatewayResponse, ModelGateway};
use crate::tools::ToolSpec;
use crate::transcript::Transcript;

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider.
///
/// Holds a rig-core client and the target model name. Each
/// [`ModelGateway::complete`] call builds one completion request from the
/// full transcript; nothing is cached between calls.
pub struct Provider {
    client: ClientKind,
    model: String,
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] for `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for a provider that needs one
    /// or if client construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let client = match selection.provider {
            ProviderKind::Anthropic => {
                let api_key = config
                    .resolve_api_key("anthropic")
                    .context("No API key found for Anthropic. Set ANTHROPIC_API_KEY or configure it in config.toml")?;
                ClientKind::Anthropic(
                    anthropic::Client::new(&api_key)
                        .context("Failed to create Anthropic client")?,
                )
            }
            ProviderKind::OpenAI => {
                let api_key = config
                    .resolve_api_key("openai")
                    .context("No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml")?;
                ClientKind::OpenAI(
                    openai::Client::new(&api_key).context("Failed to create OpenAI client")?,
                )
            }
            ProviderKind::Ollama => {
                let base_url = config
                    .base_url("ollama")
                    .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                let client = openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url.trim_end_matches('/')))
                    .build()
                    .context("Failed to create Ollama client")?;
                ClientKind::Ollama(client)
            }
        };

        tracing::debug!(provider = %selection.provider, model = %selection.model, "provider ready");
        Ok(Self {
            client,
            model: selection.model.clone(),
        })
    }
}

#[async_trait]
impl ModelGateway for Provider {
    async fn complete(
        &self,
        transcript: &Transcript,
        tools: &[ToolSpec],
        system: &str,
    ) -> Result<GatewayResponse> {
        let mut history = convert::to_rig_messages(transcript);
        // rig takes the newest message as the prompt and the rest as history.
        let prompt: RigMessage = history
            .pop()
            .ok_or_else(|| anyhow!("cannot call the model with an empty transcript"))?;
        let definitions = convert::to_tool_definitions(tools);

        let choice = dispatch!(self, |client| {
            let model = client.completion_model(&self.model);
            let response = model
                .completion_request(prompt)
                .preamble(system.to_string())
                .messages(history)
                .tools(definitions)
                .max_tokens(crate::constants::MAX_TOKENS)
                .send()
                .await?;
            response.choice
        });

        Ok(convert::from_choice(choice))
    }
}
