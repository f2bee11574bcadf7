//! Per-panel session token cache.
//!
//! Tokens are created lazily on first use and trusted until a dependent
//! status call fails, at which point the caller invalidates the entry and
//! the next cycle logs in again. There is no expiry timer.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::Target;
use crate::monitoring::provider::PanelApi;

/// Session tokens keyed by panel URL.
///
/// Owned by the aggregator and only touched from its sequential cycle.
#[derive(Debug, Default)]
pub struct SessionCache {
    tokens: HashMap<String, String>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, panel_url: &str) -> Option<&str> {
        self.tokens.get(panel_url).map(String::as_str)
    }

    /// Return the cached token for the target's panel, logging in if needed.
    ///
    /// A failed login leaves no entry behind, so the next call retries.
    pub async fn ensure(&mut self, api: &dyn PanelApi, target: &Target) -> Option<String> {
        if let Some(token) = self.tokens.get(&target.panel_url) {
            debug!(panel = %target.panel_url, "Reusing cached panel session");
            return Some(token.clone());
        }

        match api
            .login(&target.panel_url, &target.panel_user, &target.panel_password)
            .await
        {
            Ok(token) => {
                info!(panel = %target.panel_url, "Logged into panel");
                self.tokens.insert(target.panel_url.clone(), token.clone());
                Some(token)
            }
            Err(e) => {
                warn!(panel = %target.panel_url, "Login failed for panel: {e}");
                None
            }
        }
    }

    /// Drop the token for a panel. Returns `true` if one was cached.
    pub fn invalidate(&mut self, panel_url: &str) -> bool {
        let removed = self.tokens.remove(panel_url).is_some();
        if removed {
            debug!(panel = %panel_url, "Invalidated panel session");
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
