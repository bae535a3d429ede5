// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-parsing oracle.

use async_trait::async_trait;

use crate::error::SecretaryError;
use crate::traits::adapter::PluginAdapter;

/// Turns a transcript into raw, untrusted JSON text.
///
/// Implementations return the oracle's content verbatim. Validation is the
/// caller's job, so a well-formed HTTP exchange with garbage content is
/// still `Ok`.
#[async_trait]
pub trait IntentParserAdapter: PluginAdapter {
    async fn parse_intent(&self, transcript: &str) -> Result<String, SecretaryError>;
}
