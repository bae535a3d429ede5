// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed intent records parsed from language-model output.
//!
//! The intent oracle returns JSON that is treated as untrusted data. This
//! crate turns any such payload, well-formed or not, into a [`ParsedIntent`]
//! that the reconciliation engine can route without further checks.

pub mod model;
pub mod prompt;
pub mod validate;

pub use model::{Effort, IntentFields, IntentKind, ParsedIntent, TaskRefHint};
pub use prompt::system_prompt;
pub use validate::IntentValidator;
