// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries over the ledger tables.

pub mod events;
pub mod tasks;
