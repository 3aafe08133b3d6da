//! Decomposition of Objectives into micro-tasks
//!
//! The inverse failure policy of extraction: decomposition is advisory,
//! so a malformed model response degrades to an empty task list (with
//! the raw output logged for operators) instead of blocking the
//! pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Objective, Task, generate_task_id};
use crate::llm::{LlmClient, generate};
use crate::structured;

/// Fixed instruction for the decomposition call
const DECOMPOSE_INSTRUCTION: &str = "You break OKRs into detailed micro-tasks. \
    Output ONLY a JSON list of tasks, each with \"title\", \"deadline\" (ISO-8601) \
    and \"assigned_to\" fields.";

/// Configuration for the decomposer
#[derive(Debug, Clone)]
pub struct DecomposerConfig {
    /// Max tokens for the decomposition response
    pub max_tokens: u32,
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self { max_tokens: 4096 }
    }
}

/// Model output schema for one task; `id` is optional and generated
/// locally when the model omits it
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskOutput {
    #[serde(default)]
    id: Option<String>,
    title: String,
    deadline: String,
    assigned_to: String,
}

/// Breaks an [`Objective`] into assignable micro-tasks.
pub struct TaskDecomposer {
    llm: Arc<dyn LlmClient>,
    config: DecomposerConfig,
}

impl TaskDecomposer {
    pub fn new(llm: Arc<dyn LlmClient>, config: DecomposerConfig) -> Self {
        Self { llm, config }
    }

    /// Decompose an Objective into micro-tasks.
    ///
    /// Never fails: when the model response is not a parseable task list
    /// (or the call itself fails), the raw output is logged and an empty
    /// list is returned so the rest of the pipeline keeps moving.
    pub async fn decompose(&self, objective: &Objective) -> Vec<Task> {
        debug!(objective = %objective.objective, "decompose: called");

        let payload = match objective.to_canonical_json() {
            Ok(json) => format!("OKR JSON: {}", json),
            Err(e) => {
                warn!(error = %e, "decompose: objective not serializable, returning no tasks");
                return Vec::new();
            }
        };

        let raw = match generate(&self.llm, DECOMPOSE_INSTRUCTION, &payload, None, self.config.max_tokens).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "decompose: generation failed, returning no tasks");
                return Vec::new();
            }
        };

        let outputs: Vec<TaskOutput> = match structured::from_llm_text(&raw, "task list") {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!(raw = %e.raw, "decompose: could not parse model response, returning no tasks");
                return Vec::new();
            }
        };

        let tasks: Vec<Task> = outputs
            .into_iter()
            .map(|out| Task {
                id: out.id.unwrap_or_else(|| generate_task_id(&out.title)),
                title: out.title,
                deadline: out.deadline,
                assigned_to: out.assigned_to,
            })
            .collect();

        info!(task_count = tasks.len(), "decompose: produced tasks");
        tasks
    }
}
