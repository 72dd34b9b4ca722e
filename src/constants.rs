//! Centralized constants for kilo.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "kilo";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 1024;

/// Fixed system instruction sent with every gateway call.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Kilo, a helpful AI support agent. \
Use the tools available to you to assist the user.

# Tool Usage
- When you need information to answer a question, use tools immediately without announcing your intention
- The user sees the tool output, so you should interpret and explain what the results mean
- Be concise and direct in your responses

# Examples
<example>
user: what time is it?
assistant: [uses get_time tool which returns \"Sat Oct 18 14:23:45 PDT 2025\"]
The current time is 2:23 PM on Saturday, October 18th, 2025.
</example>

<example>
user: list files in current directory
assistant: [uses bash tool with \"ls\" which returns file list]
Your directory contains: main.go, README.md, and an internal/ folder.
</example>

IMPORTANT: Keep responses under 4 lines unless the user asks for more detail.";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "kilo.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Log file prefix inside the cache `logs/` directory.
pub const LOG_FILENAME: &str = "kilo.log";

// --- Exchange limits ---

/// Maximum model→tools cycles in one exchange.
pub const MAX_AGENT_ITERATIONS: usize = 5;

/// Per-invocation timeout for local tools.
pub const TOOL_TIMEOUT_SECS: u64 = 30;

/// Deadline for a whole exchange, across every iteration.
pub const EXCHANGE_TIMEOUT_SECS: u64 = 60;

/// Tool output longer than this many characters is truncated.
pub const MAX_TOOL_OUTPUT_CHARS: usize = 5000;

/// Appended to tool output that was cut at [`MAX_TOOL_OUTPUT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n...[output truncated]";

/// Environment variables removed before spawning shell tools.
pub const SHELL_STRIPPED_ENV_VARS: &[&str] = &[
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "AWS_SECRET_ACCESS_KEY",
    "GITHUB_TOKEN",
];

// --- TUI ---

/// Spinner frames shown while an exchange is in flight.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Maximum characters accepted in the TUI input box.
pub const INPUT_CHAR_LIMIT: usize = 2000;
