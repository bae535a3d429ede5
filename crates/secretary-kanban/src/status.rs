// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status normalization for the simple four-column board.
//!
//! [`normalize`] is the forgiving path: free-form status text from a voice
//! command is folded onto a column, and anything unrecognized lands in the
//! default column. [`is_valid`] is the strict path: exact canonical labels
//! only. Keep the two separate.

/// Columns of the simple board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimpleState {
    #[default]
    Backlog,
    InProgress,
    Paused,
    Done,
}

impl SimpleState {
    pub const ALL: [SimpleState; 4] = [
        SimpleState::Backlog,
        SimpleState::InProgress,
        SimpleState::Paused,
        SimpleState::Done,
    ];

    /// Canonical column label as it appears on the board.
    pub fn label(self) -> &'static str {
        match self {
            SimpleState::Backlog => "Backlog",
            SimpleState::InProgress => "Em Andamento",
            SimpleState::Paused => "Pausado",
            SimpleState::Done => "Concluido",
        }
    }

    /// Exact, case-sensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// Lowercased synonyms, Portuguese and English, accented and not.
const SYNONYMS: &[(&str, SimpleState)] = &[
    ("backlog", SimpleState::Backlog),
    ("to do", SimpleState::Backlog),
    ("todo", SimpleState::Backlog),
    ("to-do", SimpleState::Backlog),
    ("a fazer", SimpleState::Backlog),
    ("afazer", SimpleState::Backlog),
    ("pendente", SimpleState::Backlog),
    ("novo", SimpleState::Backlog),
    ("nova", SimpleState::Backlog),
    ("new", SimpleState::Backlog),
    ("em andamento", SimpleState::InProgress),
    ("andamento", SimpleState::InProgress),
    ("em progresso", SimpleState::InProgress),
    ("fazendo", SimpleState::InProgress),
    ("iniciado", SimpleState::InProgress),
    ("iniciada", SimpleState::InProgress),
    ("in progress", SimpleState::InProgress),
    ("in-progress", SimpleState::InProgress),
    ("doing", SimpleState::InProgress),
    ("started", SimpleState::InProgress),
    ("wip", SimpleState::InProgress),
    ("pausado", SimpleState::Paused),
    ("pausada", SimpleState::Paused),
    ("pausa", SimpleState::Paused),
    ("parado", SimpleState::Paused),
    ("parada", SimpleState::Paused),
    ("em espera", SimpleState::Paused),
    ("aguardando", SimpleState::Paused),
    ("bloqueado", SimpleState::Paused),
    ("bloqueada", SimpleState::Paused),
    ("paused", SimpleState::Paused),
    ("on hold", SimpleState::Paused),
    ("blocked", SimpleState::Paused),
    ("waiting", SimpleState::Paused),
    ("concluido", SimpleState::Done),
    ("concluído", SimpleState::Done),
    ("concluida", SimpleState::Done),
    ("concluída", SimpleState::Done),
    ("feito", SimpleState::Done),
    ("feita", SimpleState::Done),
    ("finalizado", SimpleState::Done),
    ("finalizada", SimpleState::Done),
    ("terminado", SimpleState::Done),
    ("terminada", SimpleState::Done),
    ("pronto", SimpleState::Done),
    ("pronta", SimpleState::Done),
    ("done", SimpleState::Done),
    ("completed", SimpleState::Done),
    ("complete", SimpleState::Done),
    ("finished", SimpleState::Done),
];

/// Fold free-form status text onto a column. Never fails: absent, empty and
/// unrecognized input all resolve to [`SimpleState::Backlog`].
pub fn normalize(raw: Option<&str>) -> SimpleState {
    let Some(raw) = raw else {
        return SimpleState::default();
    };
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return SimpleState::default();
    }
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, state)| *state)
        .unwrap_or_default()
}

/// Strict membership test against the four canonical labels.
pub fn is_valid(raw: &str) -> bool {
    SimpleState::from_label(raw).is_some()
}
