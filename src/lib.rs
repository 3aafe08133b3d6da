//! okrd - retrieval-augmented OKR decomposition and reminder scheduling
//!
//! Takes a free-text Objective-and-Key-Results statement, extracts a
//! structured objective record grounded on retrieved exemplar OKRs,
//! decomposes it into assignable micro-tasks, and schedules
//! personalized deadline reminders over pluggable channels.
//!
//! # Core Concepts
//!
//! - **Retrieval-augmented calls**: every generation call is grounded on
//!   the most similar chunks of a reference OKR corpus
//! - **Schema as request**: model output is parsed, never trusted;
//!   extraction is strict, decomposition degrades to empty
//! - **Send-once reminders**: a keyed send-state store makes the
//!   reminder window idempotent across scheduling cycles
//! - **Injected capabilities**: the LLM client, index, and channel sinks
//!   are constructed once at the entry point and passed by reference
//!
//! # Modules
//!
//! - [`index`] - exemplar chunking and similarity retrieval
//! - [`extract`] - structured objective extraction
//! - [`decompose`] - micro-task decomposition
//! - [`reminder`] - deadline-window reminder scheduling
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`config`] - configuration types and loading

pub mod cli;
pub mod config;
pub mod decompose;
pub mod domain;
pub mod extract;
pub mod index;
pub mod llm;
pub mod reminder;
pub mod structured;

// Re-export commonly used types
pub use config::{Config, IndexConfig, LlmConfig, ReminderConfig};
pub use decompose::{DecomposerConfig, TaskDecomposer};
pub use domain::{Channel, Objective, Task, UserContext};
pub use extract::{ExtractionError, ExtractorConfig, OkrExtractor};
pub use index::{ExemplarChunk, ExemplarIndex};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use reminder::{
    DispatchError, InMemorySentStore, LoggingSink, NotificationSink, ReminderError, ReminderKey, ReminderScheduler,
    SchedulerConfig, SentStore, within_reminder_window,
};
pub use structured::ParseError;
