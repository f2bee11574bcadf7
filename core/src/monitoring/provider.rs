//! Async panel API trait.
//!
//! The aggregator talks to panels only through [`PanelApi`], so tests can
//! substitute an in-memory panel and the HTTP client stays swappable.

use crate::errors::PanelError;
use crate::monitoring::types::UsageSnapshot;

/// Login and status calls against a management panel.
#[async_trait::async_trait]
pub trait PanelApi: Send + Sync {
    /// Authenticate and return the opaque session token.
    async fn login(
        &self,
        panel_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, PanelError>;

    /// Fetch the current usage snapshot using a session token.
    async fn status(&self, panel_url: &str, token: &str) -> Result<UsageSnapshot, PanelError>;
}
