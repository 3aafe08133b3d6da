//! Reminder scheduling state machine
//!
//! One scheduling cycle walks every user in order, every assigned task
//! in order, and sends at most one reminder per (user, task) pair when
//! the deadline falls inside the reminder window. Sequential by
//! contract: the send-state store is not built for concurrent mutation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Channel, Task, UserContext};
use crate::index::ExemplarIndex;
use crate::llm::{LlmClient, LlmError, generate};

use super::sink::{DispatchError, NotificationSink};
use super::store::{ReminderKey, SentStore};

/// Fixed instruction for the personalization call
const REMIND_INSTRUCTION: &str = "You write short, encouraging deadline reminders. \
    Use the user's history and the reference examples to personalize the message. \
    Output only the message text.";

/// Errors that abort a scheduling cycle
///
/// Dispatch failures do not appear here: they are logged per key and the
/// cycle continues, with the key left unsent so a later cycle inside the
/// window may re-attempt.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("task {task_id}: deadline {deadline:?} is not a valid ISO-8601 timestamp")]
    DeadlineParse {
        task_id: String,
        deadline: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to generate reminder message: {0}")]
    Generate(#[from] LlmError),
}

/// Configuration for the reminder scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Window closes this many hours before the deadline (exclusive bound)
    pub window_close_hours: i64,

    /// Window opens this many hours before the deadline (inclusive bound)
    pub window_open_hours: i64,

    /// Mark a key sent even when dispatch fails (true = at most one
    /// attempt ever; false = failed sends stay retryable in the window)
    pub mark_sent_on_failure: bool,

    /// How many exemplar chunks to retrieve per message
    pub top_k: usize,

    /// Max tokens for the personalization response
    pub max_tokens: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            window_close_hours: 23,
            window_open_hours: 25,
            mark_sent_on_failure: false,
            top_k: 4,
            max_tokens: 512,
        }
    }
}

/// True iff `deadline - now` lies in `(close, open]`.
///
/// The narrow window bounds how many periodic invocations observe an
/// eligible task while tolerating invocation jitter; the send-state
/// store makes repeats inside the window idempotent.
pub fn within_reminder_window(
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
    close: Duration,
    open: Duration,
) -> bool {
    let remaining = deadline - now;
    remaining > close && remaining <= open
}

/// Schedules personalized deadline reminders over injected sinks.
pub struct ReminderScheduler {
    llm: Arc<dyn LlmClient>,
    index: Arc<ExemplarIndex>,
    email: Arc<dyn NotificationSink>,
    dashboard: Arc<dyn NotificationSink>,
    store: Box<dyn SentStore>,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        index: Arc<ExemplarIndex>,
        email: Arc<dyn NotificationSink>,
        dashboard: Arc<dyn NotificationSink>,
        store: Box<dyn SentStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            llm,
            index,
            email,
            dashboard,
            store,
            config,
        }
    }

    /// Run one scheduling cycle at the current wall-clock time.
    pub async fn run(&mut self, tasks: &[Task], users: &[UserContext]) -> Result<(), ReminderError> {
        self.run_at(tasks, users, Utc::now()).await
    }

    /// Run one scheduling cycle at an explicit evaluation time.
    ///
    /// Users are processed in the order given and, per user, tasks in
    /// the order given; no reordering or parallel dispatch.
    pub async fn run_at(
        &mut self,
        tasks: &[Task],
        users: &[UserContext],
        now: DateTime<Utc>,
    ) -> Result<(), ReminderError> {
        debug!(task_count = tasks.len(), user_count = users.len(), %now, "run_at: called");

        for user in users {
            for task in tasks.iter().filter(|t| t.assigned_to == user.id) {
                self.maybe_remind(task, user, now).await?;
            }
        }

        Ok(())
    }

    /// Evaluate one (user, task) pair and dispatch at most once.
    pub async fn maybe_remind(
        &mut self,
        task: &Task,
        user: &UserContext,
        now: DateTime<Utc>,
    ) -> Result<(), ReminderError> {
        let key = ReminderKey::new(&user.id, &task.id);

        if self.store.has_sent(&key) {
            debug!(user_id = %user.id, task_id = %task.id, "maybe_remind: already sent, skipping");
            return Ok(());
        }

        let deadline = parse_deadline(task)?;
        if !self.should_remind(deadline, now) {
            debug!(user_id = %user.id, task_id = %task.id, "maybe_remind: outside window");
            return Ok(());
        }

        let message = self.personalize(task, user).await?;

        match self.dispatch(user, &message).await {
            Ok(()) => {
                self.store.mark_sent(key);
                info!(
                    user_id = %user.id,
                    task_id = %task.id,
                    task_title = %task.title,
                    channel = %user.preferred_channel,
                    "reminder sent"
                );
            }
            Err(e) => {
                warn!(
                    user_id = %user.id,
                    task_id = %task.id,
                    error = %e,
                    "maybe_remind: dispatch failed"
                );
                if self.config.mark_sent_on_failure {
                    self.store.mark_sent(key);
                }
            }
        }

        Ok(())
    }

    /// Window rule under this scheduler's configuration
    pub fn should_remind(&self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        within_reminder_window(
            deadline,
            now,
            Duration::hours(self.config.window_close_hours),
            Duration::hours(self.config.window_open_hours),
        )
    }

    /// Generate a personalized reminder via retrieval-augmented generation
    async fn personalize(&self, task: &Task, user: &UserContext) -> Result<String, LlmError> {
        let question = format!(
            "What kind of reminder message would help {} for task: {}?",
            user.name, task.title
        );
        let payload = format!("User History:\n{}\n\n{}", user.history, question);
        let context = self.index.context_for(&question, self.config.top_k);

        generate(&self.llm, REMIND_INSTRUCTION, &payload, context.as_deref(), self.config.max_tokens).await
    }

    /// Route to the sink matching the user's channel preference
    async fn dispatch(&self, user: &UserContext, message: &str) -> Result<(), DispatchError> {
        match user.preferred_channel {
            Channel::Email => {
                let address = user
                    .email
                    .as_deref()
                    .ok_or_else(|| DispatchError::MissingAddress(user.id.clone()))?;
                self.email.send(address, message).await
            }
            Channel::Dashboard => self.dashboard.send(&user.id, message).await,
        }
    }
}

fn parse_deadline(task: &Task) -> Result<DateTime<Utc>, ReminderError> {
    DateTime::parse_from_rfc3339(&task.deadline)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| ReminderError::DeadlineParse {
            task_id: task.id.clone(),
            deadline: task.deadline.clone(),
            source,
        })
}
