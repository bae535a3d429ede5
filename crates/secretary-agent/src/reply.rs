// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts. Plain text, Portuguese, matching the board.

use secretary_core::RemoteTask;
use secretary_kanban::{PriorityState, SimpleState, WorkflowMode, WorkflowState};

/// Transcript characters quoted back in a low-confidence reply.
const TRANSCRIPT_PREVIEW_CHARS: usize = 100;

pub fn created(title: &str, state: WorkflowState, url: Option<&str>) -> String {
    with_link(format!("✅ Tarefa \"{title}\" criada em {state}."), url)
}

pub fn updated(title: &str, url: Option<&str>) -> String {
    with_link(format!("✅ Tarefa \"{title}\" atualizada."), url)
}

pub fn completed(title: &str, url: Option<&str>) -> String {
    with_link(format!("🎉 Tarefa \"{title}\" concluida!"), url)
}

/// `verb` is the infinitive shown to the user, e.g. "atualizar".
pub fn not_found(reference: Option<&str>, verb: &str) -> String {
    match reference {
        Some(title) => format!("❌ Nao encontrei a tarefa \"{title}\" para {verb}."),
        None => format!("❌ Nao encontrei a tarefa para {verb}. Diga o nome da tarefa."),
    }
}

pub fn pending_list(tasks: &[RemoteTask], mode: WorkflowMode) -> String {
    if tasks.is_empty() {
        return "📋 Nenhuma tarefa pendente encontrada.".to_string();
    }

    let mut out = String::from("📋 Suas tarefas pendentes:\n");
    for task in tasks {
        let label = task.state_label.as_deref().unwrap_or("?");
        out.push('\n');
        out.push_str(state_marker(label, mode));
        out.push(' ');
        out.push_str(&task.title);
        if let Some(url) = &task.url {
            out.push_str(&format!(" ({url})"));
        }
        out.push_str(&format!(" - {label}"));
    }
    out
}

pub fn clarification() -> String {
    "❓ Nao entendi sua intencao. Tente:\n\
     • \"criar tarefa [nome]\"\n\
     • \"concluir tarefa [nome]\"\n\
     • \"minhas tarefas\""
        .to_string()
}

pub fn low_confidence(confidence: u8, transcript: &str) -> String {
    format!(
        "Nao entendi bem sua intencao (confianca: {confidence}%). Por favor, tente reformular.\n\n\
         Transcricao: \"{}\"",
        preview(transcript, TRANSCRIPT_PREVIEW_CHARS)
    )
}

pub fn apology() -> String {
    "Ocorreu um erro ao processar sua solicitacao. Tente novamente.".to_string()
}

fn with_link(text: String, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("{text}\n{url}"),
        None => text,
    }
}

/// First `max` characters, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

fn state_marker(label: &str, mode: WorkflowMode) -> &'static str {
    match mode.parse_label(label) {
        Some(WorkflowState::Simple(SimpleState::InProgress)) => "🔵",
        Some(WorkflowState::Simple(SimpleState::Paused)) => "🟡",
        Some(WorkflowState::Priority(PriorityState::DoNow)) => "🔴",
        Some(WorkflowState::Priority(PriorityState::Decide)) => "🟠",
        Some(WorkflowState::Priority(PriorityState::Delegate)) => "🟡",
        Some(WorkflowState::Simple(SimpleState::Done) | WorkflowState::Priority(PriorityState::Done)) => "✅",
        _ => "⚪",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, label: &str) -> RemoteTask {
        RemoteTask {
            remote_id: format!("id-{title}"),
            url: Some(format!("https://notion.so/{title}")),
            title: title.to_string(),
            state_label: Some(label.to_string()),
            due_date: None,
        }
    }

    #[test]
    fn list_shows_marker_title_url_and_label() {
        let text = pending_list(
            &[task("Taxes", "Em Andamento"), task("Gym", "Backlog")],
            WorkflowMode::Simple,
        );
        assert!(text.contains("🔵 Taxes (https://notion.so/Taxes) - Em Andamento"));
        assert!(text.contains("⚪ Gym (https://notion.so/Gym) - Backlog"));
    }

    #[test]
    fn list_uses_priority_markers() {
        let text = pending_list(&[task("Call bank", "DO (Agora)")], WorkflowMode::Priority);
        assert!(text.contains("🔴 Call bank"));
    }

    #[test]
    fn empty_list() {
        assert!(pending_list(&[], WorkflowMode::Simple).contains("Nenhuma tarefa"));
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("ação rápida", 4), "ação...");
        assert_eq!(preview("  short  ", 10), "short");
    }

    #[test]
    fn created_mentions_column_and_link() {
        let text = created(
            "Pay bill",
            WorkflowState::Priority(PriorityState::DoNow),
            Some("https://notion.so/x"),
        );
        assert!(text.contains("DO (Agora)"));
        assert!(text.ends_with("https://notion.so/x"));
    }
}
