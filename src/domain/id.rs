//! Task id generation
//!
//! Ids use the format `{6-char-hex}-task-{slug}`, e.g.
//! `019430-task-draft-rollout-plan`. The hex prefix comes from a UUIDv7
//! so ids sort roughly by creation time.

/// Generate a task id from its title
pub fn generate_task_id(title: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    format!("{}-task-{}", hex_prefix, slugify(title))
}

/// Slugify a title for use in ids
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_task_id_format() {
        let id = generate_task_id("Draft rollout plan");
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0].len(), 6);
        assert_eq!(parts[1], "task");
        assert_eq!(parts[2], "draft-rollout-plan");
    }

    #[test]
    fn test_slugify_strips_apostrophes() {
        assert_eq!(slugify("Sam's Q3 plan"), "sams-q3-plan");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("ship -- the thing!"), "ship-the-thing");
    }
}
