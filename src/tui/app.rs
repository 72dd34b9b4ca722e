//! TUI application state for kilo.
//!
//! Holds the displayed transcript, the input buffer, scroll position and the
//! in-flight flag that drive the terminal UI layout.

use crate::constants::{INPUT_CHAR_LIMIT, SPINNER_FRAMES};
use crate::transcript::Transcript;

use super::RenderEvent;

/// A failed exchange, shown inline after the turns it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNote {
    /// Number of transcript turns that precede the note.
    pub after: usize,
    pub message: String,
}

/// Core application state for the TUI.
pub struct App {
    /// Transcript as last returned by an exchange, plus the pending user turn
    /// while one is in flight.
    pub transcript: Transcript,
    /// Inline error entries.
    pub errors: Vec<ErrorNote>,
    /// Tool progress lines for the exchange in flight.
    pub activity: Vec<String>,
    /// Current text in the input box.
    pub input: String,
    /// Lines scrolled up from the bottom of the history.
    pub scroll_offset: u16,
    /// An exchange is in flight; Enter is ignored.
    pub thinking: bool,
    /// Model calls made by the exchange in flight.
    pub model_calls: usize,
    /// Current spinner frame index.
    pub spinner_frame: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            errors: Vec::new(),
            activity: Vec::new(),
            input: String::new(),
            scroll_offset: 0,
            thinking: false,
            model_calls: 0,
            spinner_frame: 0,
        }
    }

    /// Takes the input for a new exchange.
    ///
    /// Returns the trimmed text and the transcript to run it against, or
    /// `None` when the input is blank or an exchange is already in flight.
    /// The user turn is shown immediately; the exchange itself appends it to
    /// the returned copy.
    pub fn submit(&mut self) -> Option<(String, Transcript)> {
        if self.thinking {
            return None;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();

        let base = self.transcript.clone();
        self.transcript.push_user(text.clone());
        self.thinking = true;
        self.model_calls = 0;
        self.activity.clear();
        self.scroll_offset = 0;
        Some((text, base))
    }

    /// Applies an event from the exchange task.
    pub fn handle_render_event(&mut self, event: RenderEvent) {
        match event {
            RenderEvent::ModelCall { iteration } => {
                self.model_calls = iteration + 1;
            }
            RenderEvent::ToolStart { name, args } => {
                self.activity.push(format!("⚙ {} {}", name, args));
            }
            RenderEvent::ToolResult { name, result } => {
                let first = result.lines().next().unwrap_or_default();
                self.activity.push(format!("  {} → {}", name, first));
            }
            RenderEvent::Finished { transcript, result } => {
                self.transcript = transcript;
                if let Err(message) = result {
                    self.errors.push(ErrorNote {
                        after: self.transcript.len(),
                        message,
                    });
                }
                self.thinking = false;
                self.activity.clear();
                self.scroll_offset = 0;
            }
        }
    }

    /// The exchange task ended without reporting back. The displayed
    /// transcript, pending user turn included, becomes the session transcript.
    pub fn exchange_aborted(&mut self, message: String) {
        if !self.thinking {
            return;
        }
        self.errors.push(ErrorNote {
            after: self.transcript.len(),
            message,
        });
        self.thinking = false;
        self.activity.clear();
        self.scroll_offset = 0;
    }

    /// Appends a typed character, up to the input limit.
    pub fn push_char(&mut self, c: char) {
        if self.input.chars().count() < INPUT_CHAR_LIMIT {
            self.input.push(c);
        }
    }

    /// Scrolls the message history up by one line.
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    /// Scrolls the message history down by one line.
    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Advances the spinner while an exchange is in flight.
    pub fn tick_spinner(&mut self) {
        if self.thinking {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }
}
