//! Outbound notification sinks
//!
//! The email and dashboard transports are black boxes behind
//! [`NotificationSink`]; the scheduler only routes to one of them per
//! user preference and observes success or failure.

use async_trait::async_trait;
use thiserror::Error;

/// A delivery could not be completed
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("sink unreachable: {0}")]
    Unreachable(String),

    #[error("no email address on file for user {0}")]
    MissingAddress(String),
}

/// Opaque outbound channel: deliver `message` to `recipient`.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), DispatchError>;
}

/// Sink that logs deliveries instead of sending them; the default wiring
/// until a real transport is configured.
#[derive(Debug, Default)]
pub struct LoggingSink {
    label: &'static str,
}

impl LoggingSink {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), DispatchError> {
        tracing::info!(
            sink = self.label,
            recipient,
            message_len = message.len(),
            "delivering notification"
        );
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Recording sink for tests: captures deliveries, optionally fails
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, recipient: &str, message: &str) -> Result<(), DispatchError> {
            if self.fail {
                return Err(DispatchError::Unreachable("recording sink set to fail".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), message.to_string()));
            Ok(())
        }
    }
}
