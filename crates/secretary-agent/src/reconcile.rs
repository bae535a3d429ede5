// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps a validated intent to exactly one task store action.
//!
//! Each branch returns a [`Resolution`]: the reply text plus the action
//! record. A missing target is a resolution, not an error; only
//! collaborator failures come back as `Err`.

use std::sync::Arc;

use secretary_core::{
    LedgerAdapter, SecretaryError, TaskDraft, TaskPatch, TaskReference, TaskStoreAdapter,
};
use secretary_intent::{IntentKind, ParsedIntent};
use secretary_kanban::{
    PriorityLevel, WorkflowMode, WorkflowState, category_to_state, classify, state_to_category,
};
use tracing::{debug, info};

use crate::action::{Resolution, TASK_NOT_FOUND, TaskAction};
use crate::reply;

/// Title used when neither the intent nor the transcript yields one.
const UNTITLED: &str = "Nova tarefa";

/// The inbound message an intent was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct Origin<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub transcript: &'a str,
}

impl Origin<'_> {
    /// Value of the task's `Source` column.
    pub fn source(&self) -> String {
        format!("telegram:{}:{}", self.chat_id, self.message_id)
    }
}

pub struct Reconciler {
    task_store: Arc<dyn TaskStoreAdapter>,
    ledger: Arc<dyn LedgerAdapter>,
    mode: WorkflowMode,
    list_limit: usize,
    fallback_title_chars: usize,
}

impl Reconciler {
    pub fn new(
        task_store: Arc<dyn TaskStoreAdapter>,
        ledger: Arc<dyn LedgerAdapter>,
        mode: WorkflowMode,
        list_limit: usize,
        fallback_title_chars: usize,
    ) -> Self {
        Self {
            task_store,
            ledger,
            mode,
            list_limit,
            fallback_title_chars,
        }
    }

    pub async fn apply(
        &self,
        intent: &ParsedIntent,
        origin: &Origin<'_>,
    ) -> Result<Resolution, SecretaryError> {
        match intent.kind {
            IntentKind::CreateTask => self.create(intent, origin).await,
            IntentKind::UpdateTask => self.update(intent).await,
            IntentKind::CompleteTask => self.complete(intent).await,
            IntentKind::ListTasks => self.list().await,
            IntentKind::NoOp => Ok(Resolution {
                reply: reply::clarification(),
                action: TaskAction::Noop { reason: None },
            }),
        }
    }

    async fn create(
        &self,
        intent: &ParsedIntent,
        origin: &Origin<'_>,
    ) -> Result<Resolution, SecretaryError> {
        let fields = &intent.fields;
        let title = fields
            .title
            .clone()
            .unwrap_or_else(|| fallback_title(origin.transcript, self.fallback_title_chars));
        let state = self.mode.initial_state(
            fields.status.map(|s| s.label()),
            fields.importance,
            fields.urgency,
        );
        let (priority, importance, urgency) = match self.mode {
            WorkflowMode::Priority => (
                Some(classify(fields.importance, fields.urgency)),
                fields.importance,
                fields.urgency,
            ),
            WorkflowMode::Simple => (None, PriorityLevel::Unset, PriorityLevel::Unset),
        };

        let draft = TaskDraft {
            title: title.clone(),
            state,
            priority,
            importance,
            urgency,
            due_date: fields.due_date.clone(),
            notes: Some(notes_with_transcript(fields.notes.as_deref(), origin.transcript)),
            source: origin.source(),
            confidence: intent.confidence,
            tags: fields.tags.clone(),
            effort: fields.effort.map(|e| e.as_str().to_string()),
        };
        let handle = self.task_store.create_task(&draft).await?;
        info!(remote_id = %handle.remote_id, state = %state, "task created");

        self.ledger
            .upsert_task_ref(&TaskReference {
                remote_id: handle.remote_id.clone(),
                title: title.clone(),
                last_status: Some(state.label().to_string()),
                importance,
                urgency,
                created_from_message_id: Some(origin.message_id),
                created_at: String::new(),
                updated_at: String::new(),
            })
            .await;

        Ok(Resolution {
            reply: reply::created(&title, state, handle.url.as_deref()),
            action: TaskAction::Create {
                task_id: handle.remote_id,
                url: handle.url,
            },
        })
    }

    async fn update(&self, intent: &ParsedIntent) -> Result<Resolution, SecretaryError> {
        let Some(target) = self.resolve(intent).await? else {
            return Ok(not_found(intent, "atualizar", |reason| {
                TaskAction::UpdateFailed { reason }
            }));
        };

        let patch = self.update_patch(intent, &target);
        let handle = self.task_store.update_task(&target.remote_id, &patch).await?;
        info!(remote_id = %handle.remote_id, "task updated");

        let title = patch.title.clone().unwrap_or_else(|| target.title.clone());
        self.ledger
            .upsert_task_ref(&TaskReference {
                remote_id: target.remote_id.clone(),
                title: title.clone(),
                last_status: patch
                    .state
                    .map(|s| s.label().to_string())
                    .or_else(|| target.last_status.clone()),
                importance: patch.importance.unwrap_or(target.importance),
                urgency: patch.urgency.unwrap_or(target.urgency),
                created_from_message_id: None,
                created_at: String::new(),
                updated_at: String::new(),
            })
            .await;

        Ok(Resolution {
            reply: reply::updated(&title, handle.url.as_deref()),
            action: TaskAction::Update {
                task_id: handle.remote_id,
                url: handle.url,
            },
        })
    }

    async fn complete(&self, intent: &ParsedIntent) -> Result<Resolution, SecretaryError> {
        let Some(target) = self.resolve(intent).await? else {
            return Ok(not_found(intent, "concluir", |reason| {
                TaskAction::CompleteFailed { reason }
            }));
        };

        let done = self.mode.done_state();
        let patch = TaskPatch {
            state: Some(done),
            ..TaskPatch::default()
        };
        let handle = self.task_store.update_task(&target.remote_id, &patch).await?;
        info!(remote_id = %handle.remote_id, "task completed");

        self.ledger
            .upsert_task_ref(&TaskReference {
                last_status: Some(done.label().to_string()),
                created_from_message_id: None,
                ..target.clone()
            })
            .await;

        Ok(Resolution {
            reply: reply::completed(&target.title, handle.url.as_deref()),
            action: TaskAction::Complete {
                task_id: handle.remote_id,
                url: handle.url,
            },
        })
    }

    async fn list(&self) -> Result<Resolution, SecretaryError> {
        let tasks = self.task_store.query_pending(self.list_limit).await?;
        debug!(count = tasks.len(), "pending tasks fetched");
        Ok(Resolution {
            reply: reply::pending_list(&tasks, self.mode),
            action: TaskAction::List { count: tasks.len() },
        })
    }

    /// Finds the task an update or completion points at.
    ///
    /// A remote id wins: the cached row if there is one, otherwise the id is
    /// addressed directly. Without an id, the title is matched against the
    /// cache.
    async fn resolve(&self, intent: &ParsedIntent) -> Result<Option<TaskReference>, SecretaryError> {
        if let Some(remote_id) = intent.task_ref.task_id.as_deref() {
            if let Some(cached) = self.ledger.get_task_ref(remote_id).await? {
                return Ok(Some(cached));
            }
            debug!(remote_id, "task id not in cache, addressing it directly");
            return Ok(Some(TaskReference {
                remote_id: remote_id.to_string(),
                title: intent.lookup_title().unwrap_or(remote_id).to_string(),
                last_status: None,
                importance: PriorityLevel::Unset,
                urgency: PriorityLevel::Unset,
                created_from_message_id: None,
                created_at: String::new(),
                updated_at: String::new(),
            }));
        }

        match intent.lookup_title() {
            Some(title) => self.ledger.find_task_by_title(title).await,
            None => Ok(None),
        }
    }

    fn update_patch(&self, intent: &ParsedIntent, target: &TaskReference) -> TaskPatch {
        let fields = &intent.fields;
        let mut patch = TaskPatch {
            title: fields.title.clone(),
            notes: fields.notes.clone(),
            due_date: fields.due_date.clone(),
            tags: (!fields.tags.is_empty()).then(|| fields.tags.clone()),
            effort: fields.effort.map(|e| e.as_str().to_string()),
            ..TaskPatch::default()
        };

        if self.mode == WorkflowMode::Priority
            && let Some((importance, urgency)) =
                carry_forward_axes(fields.importance, fields.urgency, target)
        {
            let category = classify(importance, urgency);
            patch.state = Some(WorkflowState::Priority(category_to_state(category)));
            patch.priority = Some(category);
            patch.importance = Some(importance);
            patch.urgency = Some(urgency);
        }

        // An explicit column beats the recomputed quadrant.
        if let Some(hint) = fields.status {
            patch.state = Some(hint);
            if let WorkflowState::Priority(state) = hint
                && let Some(category) = state_to_category(state)
            {
                patch.priority = Some(category);
            }
        }
        patch
    }
}

/// Axes to re-classify with, or `None` when the intent carries neither.
///
/// A missing axis falls back to the cached value, then to Medium, so a
/// partial update never drops a task into Delete by omission.
pub fn carry_forward_axes(
    importance: PriorityLevel,
    urgency: PriorityLevel,
    cached: &TaskReference,
) -> Option<(PriorityLevel, PriorityLevel)> {
    if !importance.is_set() && !urgency.is_set() {
        return None;
    }
    let pick = |fresh: PriorityLevel, known: PriorityLevel| {
        if fresh.is_set() {
            fresh
        } else if known.is_set() {
            known
        } else {
            PriorityLevel::Medium
        }
    };
    Some((pick(importance, cached.importance), pick(urgency, cached.urgency)))
}

/// Leading characters of the transcript, for intents without a title.
pub fn fallback_title(transcript: &str, max_chars: usize) -> String {
    let title: String = transcript.trim().chars().take(max_chars).collect();
    let title = title.trim_end();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

fn notes_with_transcript(notes: Option<&str>, transcript: &str) -> String {
    let original = format!("📝 Transcricao original:\n\"{}\"", transcript.trim());
    match notes {
        Some(notes) => format!("{notes}\n\n---\n{original}"),
        None => original,
    }
}

fn not_found(
    intent: &ParsedIntent,
    verb: &str,
    action: impl FnOnce(String) -> TaskAction,
) -> Resolution {
    info!(reference = ?intent.lookup_title(), "target task not found");
    Resolution {
        reply: reply::not_found(intent.lookup_title(), verb),
        action: action(TASK_NOT_FOUND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(importance: PriorityLevel, urgency: PriorityLevel) -> TaskReference {
        TaskReference {
            remote_id: "page-1".into(),
            title: "Pay electricity bill".into(),
            last_status: None,
            importance,
            urgency,
            created_from_message_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn no_fresh_axis_means_no_reclassification() {
        let known = cached(PriorityLevel::High, PriorityLevel::High);
        assert_eq!(
            carry_forward_axes(PriorityLevel::Unset, PriorityLevel::Unset, &known),
            None
        );
    }

    #[test]
    fn missing_axis_carries_cached_value() {
        let known = cached(PriorityLevel::Low, PriorityLevel::High);
        assert_eq!(
            carry_forward_axes(PriorityLevel::High, PriorityLevel::Unset, &known),
            Some((PriorityLevel::High, PriorityLevel::High))
        );
    }

    #[test]
    fn missing_axis_without_cache_defaults_to_medium() {
        let known = cached(PriorityLevel::Unset, PriorityLevel::Unset);
        let (importance, urgency) =
            carry_forward_axes(PriorityLevel::Low, PriorityLevel::Unset, &known).unwrap();
        assert_eq!((importance, urgency), (PriorityLevel::Low, PriorityLevel::Medium));
        // Low importance with assumed urgency lands in Delegate, not Delete.
        assert_eq!(classify(importance, urgency), secretary_kanban::PriorityCategory::Delegate);
    }

    #[test]
    fn fallback_title_truncates_on_chars() {
        assert_eq!(fallback_title("  comprar pão amanhã cedo ", 10), "comprar pã");
        assert_eq!(fallback_title("curto", 50), "curto");
        assert_eq!(fallback_title("   ", 50), UNTITLED);
    }

    #[test]
    fn notes_keep_transcript() {
        assert_eq!(
            notes_with_transcript(None, " pay the bill "),
            "📝 Transcricao original:\n\"pay the bill\""
        );
        let notes = notes_with_transcript(Some("before friday"), "pay the bill");
        assert!(notes.starts_with("before friday\n\n---\n"));
        assert!(notes.ends_with("\"pay the bill\""));
    }

    #[test]
    fn source_names_chat_and_message() {
        let origin = Origin {
            chat_id: 42,
            message_id: 7,
            transcript: "",
        };
        assert_eq!(origin.source(), "telegram:42:7");
    }
}
