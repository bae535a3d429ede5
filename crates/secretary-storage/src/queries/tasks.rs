// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task reference cache.

use rusqlite::{OptionalExtension, Row, params};
use secretary_core::{SecretaryError, TaskReference};
use secretary_kanban::PriorityLevel;

use crate::database::{Database, map_tr_err};

const TASK_COLUMNS: &str =
    "remote_id, title, last_status, importance, urgency, created_from_message_id, created_at, updated_at";

/// Insert or refresh a cached task.
///
/// Title is always replaced. Status and priority axes are replaced only
/// when supplied; the originating message is kept from the first insert.
pub async fn upsert(db: &Database, task: &TaskReference) -> Result<(), SecretaryError> {
    let task = task.clone();
    let folded = task.title.to_lowercase();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO task_refs (remote_id, title, last_status, importance, urgency, created_from_message_id, title_folded)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (remote_id) DO UPDATE SET
                    title = excluded.title,
                    title_folded = excluded.title_folded,
                    last_status = COALESCE(excluded.last_status, task_refs.last_status),
                    importance = COALESCE(excluded.importance, task_refs.importance),
                    urgency = COALESCE(excluded.urgency, task_refs.urgency),
                    created_from_message_id = COALESCE(task_refs.created_from_message_id, excluded.created_from_message_id),
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![
                    task.remote_id,
                    task.title,
                    task.last_status,
                    task.importance.label(),
                    task.urgency.label(),
                    task.created_from_message_id,
                    folded,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, remote_id: &str) -> Result<Option<TaskReference>, SecretaryError> {
    let remote_id = remote_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<TaskReference>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM task_refs WHERE remote_id = ?1"),
                params![remote_id],
                task_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Case-insensitive substring match on the title. Folding is Unicode-aware
/// (`Água` matches `água`), done in Rust on both sides.
///
/// Several matches resolve to the most recently updated; equal timestamps
/// go to the latest inserted row. A blank fragment matches nothing.
pub async fn find_by_title(
    db: &Database,
    fragment: &str,
) -> Result<Option<TaskReference>, SecretaryError> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Ok(None);
    }
    let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));
    db.connection()
        .call(move |conn| -> Result<Option<TaskReference>, rusqlite::Error> {
            conn.query_row(
                &format!(
                    "SELECT {TASK_COLUMNS} FROM task_refs
                     WHERE title_folded LIKE ?1 ESCAPE '\\'
                     ORDER BY updated_at DESC, rowid DESC LIMIT 1"
                ),
                params![pattern],
                task_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Escape `LIKE` wildcards so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn task_from_row(row: &Row<'_>) -> Result<TaskReference, rusqlite::Error> {
    let importance: Option<String> = row.get(3)?;
    let urgency: Option<String> = row.get(4)?;
    Ok(TaskReference {
        remote_id: row.get(0)?,
        title: row.get(1)?,
        last_status: row.get(2)?,
        importance: PriorityLevel::from_label(importance.as_deref()),
        urgency: PriorityLevel::from_label(urgency.as_deref()),
        created_from_message_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(remote_id: &str, title: &str) -> TaskReference {
        TaskReference {
            remote_id: remote_id.into(),
            title: title.into(),
            last_status: Some("Backlog".into()),
            importance: PriorityLevel::Unset,
            urgency: PriorityLevel::Unset,
            created_from_message_id: Some(7),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let db = Database::open_in_memory().await.unwrap();
        let mut reference = task("page-1", "Pay electricity bill");
        reference.importance = PriorityLevel::High;
        upsert(&db, &reference).await.unwrap();

        let stored = get(&db, "page-1").await.unwrap().unwrap();
        assert_eq!(stored.title, "Pay electricity bill");
        assert_eq!(stored.importance, PriorityLevel::High);
        assert_eq!(stored.urgency, PriorityLevel::Unset);
        assert!(!stored.created_at.is_empty());
        assert!(get(&db, "page-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_keeps_unsupplied_values() {
        let db = Database::open_in_memory().await.unwrap();
        let mut reference = task("page-1", "Pay bill");
        reference.urgency = PriorityLevel::Low;
        upsert(&db, &reference).await.unwrap();

        let refresh = TaskReference {
            title: "Pay electricity bill".into(),
            last_status: None,
            urgency: PriorityLevel::Unset,
            created_from_message_id: Some(99),
            ..reference
        };
        upsert(&db, &refresh).await.unwrap();

        let stored = get(&db, "page-1").await.unwrap().unwrap();
        assert_eq!(stored.title, "Pay electricity bill");
        assert_eq!(stored.last_status.as_deref(), Some("Backlog"));
        assert_eq!(stored.urgency, PriorityLevel::Low);
        assert_eq!(stored.created_from_message_id, Some(7));
    }

    #[tokio::test]
    async fn title_lookup_is_case_insensitive_substring() {
        let db = Database::open_in_memory().await.unwrap();
        upsert(&db, &task("page-1", "Pay Electricity Bill")).await.unwrap();

        let found = find_by_title(&db, "electricity").await.unwrap().unwrap();
        assert_eq!(found.remote_id, "page-1");
        assert!(find_by_title(&db, "water").await.unwrap().is_none());
        assert!(find_by_title(&db, "  ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn title_lookup_folds_accented_capitals() {
        let db = Database::open_in_memory().await.unwrap();
        upsert(&db, &task("p1", "Pagar conta de Água")).await.unwrap();
        upsert(&db, &task("p2", "ÉPOCA DE AÇÃO")).await.unwrap();

        assert_eq!(find_by_title(&db, "água").await.unwrap().unwrap().remote_id, "p1");
        assert_eq!(find_by_title(&db, "CONTA DE ÁGUA").await.unwrap().unwrap().remote_id, "p1");
        assert_eq!(find_by_title(&db, "época de ação").await.unwrap().unwrap().remote_id, "p2");
        assert!(find_by_title(&db, "agua").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn renamed_title_refreshes_lookup() {
        let db = Database::open_in_memory().await.unwrap();
        upsert(&db, &task("p1", "Ligar para o Zé")).await.unwrap();
        upsert(&db, &task("p1", "Enviar Orçamento")).await.unwrap();

        assert!(find_by_title(&db, "zé").await.unwrap().is_none());
        assert_eq!(find_by_title(&db, "orçamento").await.unwrap().unwrap().remote_id, "p1");
    }

    #[tokio::test]
    async fn most_recent_match_wins() {
        let db = Database::open_in_memory().await.unwrap();
        upsert(&db, &task("old", "bill for electricity")).await.unwrap();
        upsert(&db, &task("new", "electricity bill reminder")).await.unwrap();

        let found = find_by_title(&db, "bill").await.unwrap().unwrap();
        assert_eq!(found.remote_id, "new");

        // Touching the older row makes it the most recent.
        std::thread::sleep(std::time::Duration::from_millis(5));
        upsert(&db, &task("old", "bill for electricity")).await.unwrap();
        let found = find_by_title(&db, "bill").await.unwrap().unwrap();
        assert_eq!(found.remote_id, "old");
    }

    #[tokio::test]
    async fn wildcards_in_fragment_match_literally() {
        let db = Database::open_in_memory().await.unwrap();
        upsert(&db, &task("page-1", "raise prices")).await.unwrap();
        assert!(find_by_title(&db, "%").await.unwrap().is_none());
        assert!(find_by_title(&db, "r_ise").await.unwrap().is_none());

        upsert(&db, &task("page-2", "reach 100% coverage")).await.unwrap();
        let found = find_by_title(&db, "100%").await.unwrap().unwrap();
        assert_eq!(found.remote_id, "page-2");
    }
}
