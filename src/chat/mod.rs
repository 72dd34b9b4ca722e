//! Line-based chat REPL for kilo (`kilo chat --plain`).
//!
//! Uses [`rustyline`] for line editing and persistent history. One
//! [`Transcript`] lives for the whole session and is resent in full on every
//! model call, so the model keeps context across exchanges.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::Session;
use crate::config::Config;
use crate::format;
use crate::output::StdoutRenderer;
use crate::transcript::Transcript;

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - History is persisted to `~/.cache/kilo/chat_history.txt`
/// - `/history` prints the transcript so far
///
/// A failed exchange prints the error and keeps every turn recorded before
/// the failure; the next input continues the same transcript.
pub async fn run_chat(session: Session) -> Result<()> {
    let Session {
        orchestrator,
        selection,
    } = session;

    println!(
        "{} [provider: {}] [model: {}] (Ctrl+D to exit)",
        "kilo chat".bold().cyan(),
        selection.provider.to_string().yellow(),
        selection.model.yellow(),
    );
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::history_path()?;
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    let mut transcript = Transcript::new();

    loop {
        match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if line == "/history" {
                    print_transcript(&transcript);
                    continue;
                }
                println!();

                let before = transcript.len();
                let mut renderer = StdoutRenderer::new();
                match orchestrator
                    .run_exchange(&mut transcript, line, &mut renderer)
                    .await
                {
                    Ok(answer) => renderer.render_answer(&answer),
                    Err(e) => {
                        renderer.render_error(&e.to_string());
                        tracing::debug!(
                            kept = transcript.len() - before,
                            "turns kept from failed exchange"
                        );
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    tracing::info!(turns = transcript.len(), "chat session ended");
    Ok(())
}

/// Prints every turn, tool traffic included.
fn print_transcript(transcript: &Transcript) {
    if transcript.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    for turn in transcript.turns() {
        println!("{}", format::format_turn(turn));
    }
    println!();
}
