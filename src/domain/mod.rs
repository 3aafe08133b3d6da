//! Domain records shared across the pipeline
//!
//! These are the wire shapes the components exchange: a structured
//! [`Objective`] extracted from raw OKR text, the [`Task`] records it
//! decomposes into, and the [`UserContext`] records the reminder
//! scheduler consumes.

mod id;

pub use id::generate_task_id;

use serde::{Deserialize, Serialize};

/// Structured record extracted from one free-text OKR statement.
///
/// All three fields must be present in the model output; an absent field
/// is an extraction failure, an empty string is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// The objective statement itself
    pub objective: String,

    /// Concrete deliverables, in the order the model produced them
    pub deliverables: Vec<String>,

    /// Free-text timeline ("Q3", "by June 30", ...)
    pub timeline: String,
}

impl Objective {
    /// Canonical JSON form used when prompting the decomposer
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One decomposed unit of work, consumed read-only by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task id (`{hex}-task-{slug}`)
    pub id: String,

    /// Short human-readable title
    pub title: String,

    /// ISO-8601 deadline; parsed lazily by the scheduler
    pub deadline: String,

    /// Id of the user responsible for this task
    pub assigned_to: String,
}

/// Notification transport preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Dashboard,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Dashboard => write!(f, "dashboard"),
        }
    }
}

/// Per-user context supplied externally; read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: String,

    pub name: String,

    /// Free-text working history used to personalize reminders
    #[serde(default)]
    pub history: String,

    pub preferred_channel: Channel,

    /// Only required when `preferred_channel` is email
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_canonical_json_round_trips() {
        let objective = Objective {
            objective: "Improve latency".to_string(),
            deliverables: vec!["p99 under 200ms".to_string(), "dashboard".to_string()],
            timeline: "Q3".to_string(),
        };

        let json = objective.to_canonical_json().unwrap();
        let back: Objective = serde_json::from_str(&json).unwrap();
        assert_eq!(back, objective);
    }

    #[test]
    fn test_objective_rejects_missing_field() {
        // No defaults on Objective: a missing field is a deserialization error
        let result: Result<Objective, _> =
            serde_json::from_str(r#"{"objective": "x", "deliverables": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_channel_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Channel::Email).unwrap(), "\"email\"");
        let channel: Channel = serde_json::from_str("\"dashboard\"").unwrap();
        assert_eq!(channel, Channel::Dashboard);
    }

    #[test]
    fn test_user_context_email_optional() {
        let user: UserContext = serde_json::from_str(
            r#"{"id": "u1", "name": "Sam", "preferred_channel": "dashboard"}"#,
        )
        .unwrap();
        assert_eq!(user.email, None);
        assert_eq!(user.history, "");
    }
}
