//! Prompt construction for status summaries.

use crate::integrations::StatusUpdate;

/// Render status updates as a numbered list for the summary prompt.
///
/// Each update becomes a header line, its trimmed body (when non-empty), and
/// a blank separator line.
pub fn format_updates_for_prompt(updates: &[StatusUpdate]) -> String {
    let mut lines = Vec::with_capacity(updates.len() * 3);

    for (i, update) in updates.iter().enumerate() {
        let mut header = format!(
            "[{}] {} | {} | @{}",
            i + 1,
            update.created_date(),
            update.status_label(),
            update.creator_login()
        );
        if let Some(schedule) = update.schedule() {
            header.push_str(" | ");
            header.push_str(&schedule);
        }

        lines.push(header);
        let body = update.trimmed_body();
        if !body.is_empty() {
            lines.push(body.to_string());
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Build the instruction prompt asking for a summary of `updates_text`.
pub fn build_summary_prompt(project_name: &str, updates_text: &str) -> String {
    format!(
        r#"You are summarizing the status update history for a GitHub Project board called "{project_name}".

Below are all the status updates posted to the project, in chronological order. Each entry includes the date, status enum (ON_TRACK, AT_RISK, OFF_TRACK, INACTIVE, COMPLETE), the creator, and the body text.

Produce a concise markdown summary of the project's progress. Focus on:
- Key milestones and accomplishments
- Current status and trajectory
- Any risks or blockers mentioned
- What's coming next

Keep it to 2-4 short paragraphs. Use plain markdown (no H1 headers). Start directly with the summary content.

---

{updates_text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{Actor, StatusUpdateStatus};

    fn update(
        id: &str,
        created_at: &str,
        status: Option<StatusUpdateStatus>,
        creator: Option<&str>,
        body: &str,
    ) -> StatusUpdate {
        StatusUpdate {
            id: id.to_string(),
            body: Some(body.to_string()),
            status,
            created_at: created_at.to_string(),
            creator: creator.map(|login| Actor { login: login.to_string() }),
            start_date: None,
            target_date: None,
        }
    }

    fn three_updates() -> Vec<StatusUpdate> {
        vec![
            update(
                "1",
                "2025-01-10T08:00:00Z",
                Some(StatusUpdateStatus::OnTrack),
                Some("alice"),
                "Shipped v1",
            ),
            update(
                "2",
                "2025-02-11T09:30:00Z",
                Some(StatusUpdateStatus::AtRisk),
                Some("bob"),
                "Delay on infra",
            ),
            update(
                "3",
                "2025-03-12T10:45:00Z",
                Some(StatusUpdateStatus::Complete),
                Some("alice"),
                "Launched",
            ),
        ]
    }

    #[test]
    fn test_three_updates_in_order() {
        let text = format_updates_for_prompt(&three_updates());

        let expected = "[1] 2025-01-10 | ON_TRACK | @alice\n\
                        Shipped v1\n\
                        \n\
                        [2] 2025-02-11 | AT_RISK | @bob\n\
                        Delay on infra\n\
                        \n\
                        [3] 2025-03-12 | COMPLETE | @alice\n\
                        Launched\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let updates = three_updates();
        assert_eq!(format_updates_for_prompt(&updates), format_updates_for_prompt(&updates));
    }

    #[test]
    fn test_empty_input_yields_empty_text() {
        assert_eq!(format_updates_for_prompt(&[]), "");
    }

    #[test]
    fn test_defaults_and_empty_body() {
        let mut bare = update("1", "2025-05-01T00:00:00Z", None, None, "   \n");
        bare.body = None;
        let blank = update("2", "2025-05-02T00:00:00Z", None, None, "   \n");

        let text = format_updates_for_prompt(&[bare, blank]);
        assert_eq!(
            text,
            "[1] 2025-05-01 | INACTIVE | @unknown\n\n[2] 2025-05-02 | INACTIVE | @unknown\n"
        );
    }

    #[test]
    fn test_schedule_uses_placeholder_for_missing_end() {
        let mut only_target = update(
            "1",
            "2025-06-01T12:00:00Z",
            Some(StatusUpdateStatus::OffTrack),
            Some("carol"),
            "Slipping",
        );
        only_target.target_date = Some("2025-07-01".to_string());

        let mut both = only_target.clone();
        both.start_date = Some("2025-05-15".to_string());

        let text = format_updates_for_prompt(&[only_target, both]);
        let headers: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(
            headers,
            vec![
                "[1] 2025-06-01 | OFF_TRACK | @carol | ? → 2025-07-01",
                "[2] 2025-06-01 | OFF_TRACK | @carol | 2025-05-15 → 2025-07-01",
            ]
        );
    }

    #[test]
    fn test_body_is_trimmed_but_keeps_inner_lines() {
        let multi = update(
            "1",
            "2025-01-01T00:00:00Z",
            Some(StatusUpdateStatus::OnTrack),
            Some("dana"),
            "\n  - item one\n- item two  \n\n",
        );
        let text = format_updates_for_prompt(&[multi]);
        assert_eq!(text, "[1] 2025-01-01 | ON_TRACK | @dana\n- item one\n- item two\n");
    }

    #[test]
    fn test_summary_prompt_embeds_name_and_updates() {
        let updates_text = format_updates_for_prompt(&three_updates());
        let prompt = build_summary_prompt("Roadmap", &updates_text);

        assert!(prompt.contains(r#"GitHub Project board called "Roadmap""#));
        assert!(prompt.contains("ON_TRACK, AT_RISK, OFF_TRACK, INACTIVE, COMPLETE"));
        assert!(prompt.contains("no H1 headers"));
        assert!(prompt.ends_with(&format!("---\n\n{}", updates_text)));
    }
}
