//! Tool-calling orchestration loop.
//!
//! One exchange starts when user text is appended to the transcript and moves
//! through [`ExchangeState`]:
//!
//! ```text
//! AwaitingModel -> { ExecutingTools -> AwaitingModel }* -> Done | Failed
//! ```
//!
//! The loop resends the whole transcript on every model call, runs requested
//! tools sequentially in request order, and stops on the first text-only
//! response. Tool failures are folded into result text; only transport
//! errors, protocol anomalies, iteration exhaustion and the exchange
//! deadline end an exchange early. On every outcome the transcript keeps
//! whatever was appended before the stopping point.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::constants::{
    EXCHANGE_TIMEOUT_SECS, MAX_AGENT_ITERATIONS, MAX_TOOL_OUTPUT_CHARS, TOOL_TIMEOUT_SECS,
};
use crate::gateway::{GatewayResponse, ModelGateway, ToolRequest};
use crate::output::Renderer;
use crate::tools::{ToolInvoker, ToolSpec};
use crate::transcript::{ProtocolError, Transcript, Turn};

/// Bounds applied to every exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of model→tools cycles.
    pub max_iterations: usize,
    /// Timeout for a single tool invocation.
    pub tool_timeout: Duration,
    /// Deadline for the whole exchange.
    pub exchange_timeout: Duration,
    /// Tool output cap, in characters.
    pub max_tool_output_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: MAX_AGENT_ITERATIONS,
            tool_timeout: Duration::from_secs(TOOL_TIMEOUT_SECS),
            exchange_timeout: Duration::from_secs(EXCHANGE_TIMEOUT_SECS),
            max_tool_output_chars: MAX_TOOL_OUTPUT_CHARS,
        }
    }
}

/// Reasons an exchange ends without an answer.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The gateway call failed. Displayed verbatim.
    #[error(transparent)]
    Transport(anyhow::Error),
    /// The model returned neither text nor tool requests.
    #[error("empty response from model (no text and no tool calls)")]
    EmptyResponse,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("too many tool iterations: reached maximum of {0}, the model kept calling tools")]
    MaxIterations(usize),
    #[error("exchange timed out after {}", crate::tools::format_duration(*.0))]
    DeadlineExceeded(Duration),
}

/// States of one exchange.
#[derive(Debug)]
pub enum ExchangeState {
    /// Next step is a model call with the full transcript.
    AwaitingModel,
    /// Tool requests already appended to the transcript, waiting for results.
    ExecutingTools { pending: Vec<ToolRequest> },
    Done(String),
    Failed(ExchangeError),
}

/// Transient bookkeeping for one exchange.
#[derive(Debug)]
pub struct ExchangeContext {
    /// Completed AwaitingModel→ExecutingTools transitions.
    pub iterations: usize,
    /// Gateway calls made so far.
    pub model_calls: usize,
    deadline: Instant,
}

impl ExchangeContext {
    pub fn new(timeout: Duration) -> Self {
        Self {
            iterations: 0,
            model_calls: 0,
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the exchange deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Drives exchanges against a model gateway and a tool invoker.
pub struct Orchestrator {
    gateway: Arc<dyn ModelGateway>,
    invoker: ToolInvoker,
    limits: Limits,
    system_prompt: String,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        invoker: ToolInvoker,
        limits: Limits,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            invoker,
            limits,
            system_prompt: system_prompt.into(),
        }
    }

    /// Specs advertised to the model on every call.
    pub fn tool_specs(&self) -> &[ToolSpec] {
        self.invoker.registry().specs()
    }

    /// Runs one exchange for `input`.
    ///
    /// Appends the user turn, then steps the state machine until it reaches
    /// `Done` or `Failed`. The transcript is mutated in place and keeps all
    /// turns appended before a failure.
    pub async fn run_exchange(
        &self,
        transcript: &mut Transcript,
        input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<String, ExchangeError> {
        transcript.push_user(input);
        let mut ctx = ExchangeContext::new(self.limits.exchange_timeout);
        let mut state = ExchangeState::AwaitingModel;

        loop {
            state = match state {
                ExchangeState::Done(text) => {
                    tracing::info!(
                        model_calls = ctx.model_calls,
                        iterations = ctx.iterations,
                        "exchange done"
                    );
                    return Ok(text);
                }
                ExchangeState::Failed(err) => {
                    tracing::warn!(
                        model_calls = ctx.model_calls,
                        iterations = ctx.iterations,
                        error = %err,
                        "exchange failed"
                    );
                    return Err(err);
                }
                state => self.step(state, transcript, &mut ctx, renderer).await,
            };
        }
    }

    /// Performs a single transition. Terminal states are returned unchanged.
    pub async fn step(
        &self,
        state: ExchangeState,
        transcript: &mut Transcript,
        ctx: &mut ExchangeContext,
        renderer: &mut dyn Renderer,
    ) -> ExchangeState {
        match state {
            ExchangeState::AwaitingModel => self.call_model(transcript, ctx, renderer).await,
            ExchangeState::ExecutingTools { pending } => {
                self.execute_tools(pending, transcript, ctx, renderer).await
            }
            terminal => terminal,
        }
    }

    async fn call_model(
        &self,
        transcript: &mut Transcript,
        ctx: &mut ExchangeContext,
        renderer: &mut dyn Renderer,
    ) -> ExchangeState {
        if let Err(e) = transcript.validate() {
            return ExchangeState::Failed(e.into());
        }

        let remaining = ctx.remaining();
        if remaining.is_zero() {
            return ExchangeState::Failed(ExchangeError::DeadlineExceeded(
                self.limits.exchange_timeout,
            ));
        }

        renderer.model_call(ctx.model_calls);
        tracing::info!(
            call = ctx.model_calls + 1,
            turns = transcript.len(),
            "calling model"
        );
        ctx.model_calls += 1;

        let call = self
            .gateway
            .complete(transcript, self.tool_specs(), &self.system_prompt);
        match tokio::time::timeout(remaining, call).await {
            Err(_) => ExchangeState::Failed(ExchangeError::DeadlineExceeded(
                self.limits.exchange_timeout,
            )),
            Ok(Err(e)) => ExchangeState::Failed(ExchangeError::Transport(e)),
            Ok(Ok(response)) => self.accept_response(response, transcript, ctx),
        }
    }

    /// Applies a gateway response to the transcript and picks the next state.
    ///
    /// Text that arrives together with tool requests is dropped; only the
    /// requests are recorded.
    pub fn accept_response(
        &self,
        response: GatewayResponse,
        transcript: &mut Transcript,
        ctx: &mut ExchangeContext,
    ) -> ExchangeState {
        let GatewayResponse {
            content,
            tool_requests,
        } = response;

        if tool_requests.is_empty() {
            if content.is_empty() {
                return ExchangeState::Failed(ExchangeError::EmptyResponse);
            }
            transcript.push(Turn::assistant(content.clone()));
            return ExchangeState::Done(content);
        }

        if ctx.iterations >= self.limits.max_iterations {
            return ExchangeState::Failed(ExchangeError::MaxIterations(
                self.limits.max_iterations,
            ));
        }

        let mut batch: HashSet<&str> = HashSet::new();
        for request in &tool_requests {
            if transcript.has_call_id(&request.call_id) || !batch.insert(&request.call_id) {
                return ExchangeState::Failed(ExchangeError::Protocol(
                    ProtocolError::DuplicateCallId {
                        call_id: request.call_id.clone(),
                    },
                ));
            }
        }

        if !content.is_empty() {
            tracing::debug!(chars = content.len(), "dropping text sent alongside tool calls");
        }

        for request in &tool_requests {
            transcript.push(Turn::ToolRequest {
                call_id: request.call_id.clone(),
                tool_name: request.name.clone(),
                arguments: request.arguments.clone(),
            });
        }
        ctx.iterations += 1;
        tracing::debug!(
            iteration = ctx.iterations,
            requests = tool_requests.len(),
            "executing tools"
        );
        ExchangeState::ExecutingTools {
            pending: tool_requests,
        }
    }

    async fn execute_tools(
        &self,
        pending: Vec<ToolRequest>,
        transcript: &mut Transcript,
        ctx: &mut ExchangeContext,
        renderer: &mut dyn Renderer,
    ) -> ExchangeState {
        let mut pending = pending.into_iter();
        while let Some(request) = pending.next() {
            let remaining = ctx.remaining();
            if remaining.is_zero() {
                // Answer every outstanding request so the transcript stays
                // valid for the next exchange.
                for request in std::iter::once(request).chain(pending) {
                    transcript.push(deadline_result(request.call_id));
                }
                return ExchangeState::Failed(ExchangeError::DeadlineExceeded(
                    self.limits.exchange_timeout,
                ));
            }

            renderer.tool_start(&request.name, &request.arguments);
            let resolve = self.invoker.resolve(
                &request.call_id,
                &request.name,
                &request.arguments,
                self.limits.tool_timeout,
            );
            let turn = match tokio::time::timeout(remaining, resolve).await {
                Ok(turn) => turn,
                Err(_) => {
                    tracing::warn!(tool = %request.name, "exchange deadline hit during tool run");
                    deadline_result(request.call_id.clone())
                }
            };
            renderer.tool_result(&request.name, turn.text());
            transcript.push(turn);
        }
        ExchangeState::AwaitingModel
    }
}

/// Result for a request the exchange deadline cut off.
fn deadline_result(call_id: String) -> Turn {
    Turn::ToolResult {
        call_id,
        content: "Error: cancelled, exchange deadline exceeded".to_string(),
        truncated: false,
    }
}
