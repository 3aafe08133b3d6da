//! Deadline reminder scheduling
//!
//! A two-state machine per (user, task) pair: NOT_SENT until one
//! successful dispatch inside the reminder window, then SENT for the
//! life of the store. See [`scheduler::ReminderScheduler`].

pub mod scheduler;
pub mod sink;
pub mod store;

pub use scheduler::{ReminderError, ReminderScheduler, SchedulerConfig, within_reminder_window};
pub use sink::{DispatchError, LoggingSink, NotificationSink};
pub use store::{InMemorySentStore, ReminderKey, SentStore};
