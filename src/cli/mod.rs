//! Command-line interface definition and dispatch for kilo.
//!
//! Uses [`clap`] derive macros. Running `kilo` with no subcommand opens the
//! terminal UI; every other surface shares one [`Orchestrator`] setup path.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::agent::Orchestrator;
use crate::config::Config;
use crate::output::StdoutRenderer;
use crate::provider::{self, ModelSelection, Provider};
use crate::tools::{ToolInvoker, ToolRegistry};
use crate::transcript::Transcript;
use crate::{chat, tui};

/// Top-level CLI structure for kilo.
#[derive(Parser, Debug)]
#[command(name = "kilo", version, about = "A terminal support agent that can run tools")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands. Variant doc comments double as `--help` text.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Start an interactive chat session (terminal UI by default)
    Chat {
        /// Use a line-based prompt instead of the terminal UI
        #[arg(long)]
        plain: bool,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// List the tools the model can call
    Tools,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Provider and model overrides shared by the session commands.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ModelArgs {
    /// Provider to use (anthropic, openai, ollama)
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Model to use, or provider/model shorthand (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Subcommands for the `config` command.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config with API keys masked
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Everything a session surface needs.
pub struct Session {
    pub orchestrator: Arc<Orchestrator>,
    pub selection: ModelSelection,
}

/// Wires config, provider, tools and limits into an [`Orchestrator`].
pub fn build_session(config: &Config, args: &ModelArgs) -> Result<Session> {
    let selection = provider::resolve_model(args.provider.as_deref(), args.model.as_deref(), config)?;
    let gateway = Provider::from_config(config, &selection)?;
    let registry = builtin_registry()?;
    let limits = config.limits();
    let tools = registry.len();
    let invoker = ToolInvoker::new(Arc::new(registry), limits.max_tool_output_chars);
    tracing::info!(
        provider = %selection.provider,
        model = %selection.model,
        tools,
        max_iterations = limits.max_iterations,
        "session ready"
    );
    let orchestrator = Orchestrator::new(
        Arc::new(gateway),
        invoker,
        limits,
        config.system_prompt(),
    );
    Ok(Session {
        orchestrator: Arc::new(orchestrator),
        selection,
    })
}

fn builtin_registry() -> Result<ToolRegistry> {
    let workdir: PathBuf = std::env::current_dir().context("Failed to read working directory")?;
    Ok(ToolRegistry::with_builtins(workdir)?)
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => {
            let config = Config::load()?;
            let session = build_session(&config, &ModelArgs::default())?;
            tui::run_tui(session).await
        }
        Some(Commands::Chat { plain, model }) => {
            let config = Config::load()?;
            let session = build_session(&config, &model)?;
            if plain {
                chat::run_chat(session).await
            } else {
                tui::run_tui(session).await
            }
        }
        Some(Commands::Ask { prompt, model }) => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("No prompt provided. Usage: kilo ask \"your question here\"");
            }

            let config = Config::load()?;
            let session = build_session(&config, &model)?;

            println!(
                "{} [model: {}]",
                "kilo".bold().cyan(),
                session.selection.model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let mut transcript = Transcript::new();
            let mut renderer = StdoutRenderer::new();
            let answer = session
                .orchestrator
                .run_exchange(&mut transcript, &prompt, &mut renderer)
                .await?;
            renderer.render_answer(&answer);
            Ok(())
        }
        Some(Commands::Tools) => {
            let registry = builtin_registry()?;
            if registry.is_empty() {
                println!("{}", "No tools registered.".dimmed());
            }
            for spec in registry.specs() {
                println!("{}  {}", spec.name.bold().cyan(), spec.description);
                for (name, param) in &spec.parameters {
                    let required = if spec.required.contains(name) {
                        " (required)"
                    } else {
                        ""
                    };
                    println!(
                        "    {} {}{}  {}",
                        name.yellow(),
                        param.kind.dimmed(),
                        required.dimmed(),
                        param.description
                    );
                }
            }
            Ok(())
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                let config = Config::load()?;
                let path = Config::config_path()?;
                println!("{} {}", "Config path:".bold(), path.display());
                println!();
                println!("{}", toml::to_string_pretty(&config.redacted())?);
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["kilo"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_chat_flags() {
        let cli = Cli::try_parse_from([
            "kilo", "chat", "--plain", "--provider", "ollama", "-m", "qwen3", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Chat { plain, model }) => {
                assert!(plain);
                assert_eq!(model.provider.as_deref(), Some("ollama"));
                assert_eq!(model.model.as_deref(), Some("qwen3"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ask_collects_words() {
        let cli = Cli::try_parse_from(["kilo", "ask", "what", "time", "is", "it"]).unwrap();
        match cli.command {
            Some(Commands::Ask { prompt, .. }) => assert_eq!(prompt.join(" "), "what time is it"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
