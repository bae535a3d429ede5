// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic kanban rules for Secretary.
//!
//! Two leaf components live here, both pure and total:
//!
//! - [`priority`]: the importance x urgency matrix that maps two independent
//!   signals to a [`PriorityCategory`] and its canonical column.
//! - [`status`]: the fuzzy status normalizer for the simple four-column board.
//!
//! [`workflow`] ties them together: a deployment runs exactly one
//! [`WorkflowMode`], and every state that reaches the task store is checked
//! against it.

pub mod error;
pub mod priority;
pub mod status;
pub mod workflow;

pub use error::WorkflowError;
pub use priority::{
    PriorityCategory, PriorityLevel, PriorityState, category_name_to_state, category_to_state,
    classify, label_to_category, state_to_category,
};
pub use status::{SimpleState, is_valid, normalize};
pub use workflow::{WorkflowMode, WorkflowState};
