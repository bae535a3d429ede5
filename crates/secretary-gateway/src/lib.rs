// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Secretary.
//!
//! Hosts the Telegram webhook and liveness endpoints. Each delivery is
//! processed inline by the [`Engine`](secretary_agent::Engine); Telegram
//! always gets `200 {"ok":true}` so it never redelivers on our account.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, MetricsRender, ServerConfig, build_router, start_server};
