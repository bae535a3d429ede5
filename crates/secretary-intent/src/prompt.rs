// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt sent to the intent oracle.

use secretary_kanban::{PriorityLevel, WorkflowMode};

use crate::model::Effort;

/// Build the system prompt for the configured board.
///
/// The prompt pins the response to a single JSON object. The validator
/// still treats whatever comes back as untrusted.
pub fn system_prompt(mode: WorkflowMode) -> String {
    let statuses = quoted(&mode.labels());
    let levels = quoted(
        &PriorityLevel::ALL
            .iter()
            .filter_map(|l| l.label())
            .collect::<Vec<_>>(),
    );
    let efforts = quoted(&[Effort::S.as_str(), Effort::M.as_str(), Effort::L.as_str()]);

    let board_rules = match mode {
        WorkflowMode::Simple => format!(
            "Set fields.status only when the speaker names a column. Valid values: {statuses}. \
             Leave importance and urgency null."
        ),
        WorkflowMode::Priority => format!(
            "Rate fields.importance and fields.urgency with one of {levels} whenever the speaker \
             gives any hint. Set fields.status only to move a task explicitly. Valid values: {statuses}."
        ),
    };

    format!(
        r#"You turn short voice notes into task-management intents.

Reply with exactly one JSON object and nothing else:
{{
  "intent": "create_task" | "update_task" | "complete_task" | "list_tasks" | "noop",
  "confidence": integer 0-100,
  "task_ref": {{ "task_id": string | null, "title_guess": string | null }},
  "fields": {{
    "title": string | null,
    "notes": string | null,
    "due_date": "YYYY-MM-DD" | null,
    "tags": [string],
    "effort": {efforts} | null,
    "status": string | null,
    "importance": {levels} | null,
    "urgency": {levels} | null
  }}
}}

Intents:
- create_task: the speaker wants to record something new to do.
- update_task: the speaker changes an existing task (date, notes, column).
- complete_task: the speaker says an existing task is finished.
- list_tasks: the speaker asks what is pending.
- noop: anything else. Put a short reason in fields.notes.

For update_task and complete_task fill task_ref.title_guess with the words the speaker used to name the task.

{board_rules}

Confidence:
- 90-100: the request is explicit.
- 60-89: the request is clear but some details are guessed.
- below 60: you are unsure what the speaker wants.

Resolve relative dates against today's date and always write them as YYYY-MM-DD."#
    )
}

fn quoted(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_board_lists_its_columns() {
        let prompt = system_prompt(WorkflowMode::Simple);
        for label in ["Backlog", "Em Andamento", "Pausado", "Concluido"] {
            assert!(prompt.contains(&format!("\"{label}\"")), "{label}");
        }
        assert!(!prompt.contains("DO (Agora)"));
    }

    #[test]
    fn priority_board_asks_for_axes() {
        let prompt = system_prompt(WorkflowMode::Priority);
        assert!(prompt.contains("\"DO (Agora)\""));
        assert!(prompt.contains("\"DONE\""));
        assert!(prompt.contains("\"High\" | \"Medium\" | \"Low\""));
        assert!(!prompt.contains("\"Em Andamento\""));
    }

    #[test]
    fn schema_names_every_intent() {
        let prompt = system_prompt(WorkflowMode::Simple);
        for kind in ["create_task", "update_task", "complete_task", "list_tasks", "noop"] {
            assert!(prompt.contains(kind));
        }
    }
}
