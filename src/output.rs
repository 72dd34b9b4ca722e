//! Output rendering abstraction for kilo.
//!
//! Defines the [`Renderer`] trait that decouples exchange progress from the
//! display layer. [`StdoutRenderer`] prints to the terminal; the TUI has its
//! own renderer that forwards events over a channel.

use colored::Colorize;

use crate::format;

/// Receives progress from a running exchange.
pub trait Renderer: Send {
    /// Called before each model call. `iteration` starts at 0.
    fn model_call(&mut self, _iteration: usize) {}

    /// The loop is about to run a tool.
    fn tool_start(&mut self, name: &str, arguments: &str);

    /// A tool finished; `result` is the text placed in the transcript.
    fn tool_result(&mut self, name: &str, result: &str);
}

/// Renders exchange progress and outcomes directly to stdout.
pub struct StdoutRenderer {
    model_calls: usize,
    tool_calls: usize,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self {
            model_calls: 0,
            tool_calls: 0,
        }
    }

    /// Prints the final assistant answer, with a usage footer when tools ran.
    pub fn render_answer(&mut self, text: &str) {
        println!("{}", format::render_markdown_lite(text));
        if let Some(footer) = self.footer() {
            println!();
            println!("{}", footer.dimmed());
        }
    }

    fn footer(&self) -> Option<String> {
        (self.tool_calls > 0).then(|| {
            format!(
                "[{} model calls, {} tool calls]",
                self.model_calls, self.tool_calls
            )
        })
    }

    /// Prints an exchange failure.
    pub fn render_error(&mut self, err: &str) {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}

impl Renderer for StdoutRenderer {
    fn model_call(&mut self, iteration: usize) {
        self.model_calls = iteration + 1;
    }

    fn tool_start(&mut self, name: &str, arguments: &str) {
        self.tool_calls += 1;
        println!(
            "{} {} {}",
            "⚙".yellow(),
            name.yellow().bold(),
            format::preview(arguments, 1, 120).dimmed()
        );
    }

    fn tool_result(&mut self, _name: &str, result: &str) {
        for line in format::preview(result, 6, 120).lines() {
            println!("  {}", line.dimmed());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_counts_calls() {
        let mut renderer = StdoutRenderer::new();
        renderer.model_call(0);
        assert_eq!(renderer.footer(), None);

        renderer.tool_calls = 2;
        renderer.model_call(1);
        assert_eq!(
            renderer.footer().as_deref(),
            Some("[2 model calls, 2 tool calls]")
        );
    }
}
