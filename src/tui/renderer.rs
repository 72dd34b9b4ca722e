//! Renderer that forwards exchange progress to the TUI event loop.
//!
//! [`TuiRenderer`] implements [`Renderer`] by sending [`RenderEvent`]
//! variants over a tokio mpsc channel. The exchange task finishes by sending
//! [`RenderEvent::Finished`] with the transcript it was lent.

use tokio::sync::mpsc;

use crate::output::Renderer;
use crate::transcript::Transcript;

/// Events sent from the exchange task to the TUI event loop.
#[derive(Debug)]
pub enum RenderEvent {
    /// A model call is about to start. `iteration` starts at 0.
    ModelCall { iteration: usize },
    /// The loop started executing a tool.
    ToolStart {
        name: String,
        /// Raw JSON arguments.
        args: String,
    },
    /// A tool execution completed.
    ToolResult { name: String, result: String },
    /// The exchange ended. The transcript comes back with every turn it
    /// recorded, including on failure.
    Finished {
        transcript: Transcript,
        result: Result<String, String>,
    },
}

/// Renderer that sends events to the TUI via an mpsc channel.
///
/// Progress events are fire-and-forget: if the channel is full or closed the
/// event is dropped.
pub struct TuiRenderer {
    tx: mpsc::Sender<RenderEvent>,
}

impl TuiRenderer {
    pub fn new(tx: mpsc::Sender<RenderEvent>) -> Self {
        Self { tx }
    }
}

impl Renderer for TuiRenderer {
    fn model_call(&mut self, iteration: usize) {
        let _ = self.tx.try_send(RenderEvent::ModelCall { iteration });
    }

    fn tool_start(&mut self, name: &str, arguments: &str) {
        let _ = self.tx.try_send(RenderEvent::ToolStart {
            name: name.to_string(),
            args: arguments.to_string(),
        });
    }

    fn tool_result(&mut self, name: &str, result: &str) {
        let _ = self.tx.try_send(RenderEvent::ToolResult {
            name: name.to_string(),
            result: result.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_are_forwarded_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut renderer = TuiRenderer::new(tx);
        renderer.model_call(0);
        renderer.tool_start("get_time", "{}");
        renderer.tool_result("get_time", "noon");
        drop(renderer);

        assert!(matches!(
            rx.recv().await,
            Some(RenderEvent::ModelCall { iteration: 0 })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(RenderEvent::ToolStart { ref name, .. }) if name == "get_time"
        ));
        assert!(matches!(
            rx.recv().await,
            Some(RenderEvent::ToolResult { ref result, .. }) if result == "noon"
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_channel_is_ignored() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut renderer = TuiRenderer::new(tx);
        renderer.tool_start("bash", "{}");
    }
}
