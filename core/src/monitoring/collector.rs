//! Usage collection for a single target.

use tracing::warn;

use crate::config::Target;
use crate::monitoring::provider::PanelApi;
use crate::monitoring::types::UsageSnapshot;

/// Fetch one usage snapshot for `target` using an existing session token.
///
/// Returns `None` on any failure after logging a warning. No retry happens
/// here; the caller decides whether to skip the target for this cycle.
pub async fn collect_usage(
    api: &dyn PanelApi,
    target: &Target,
    token: &str,
) -> Option<UsageSnapshot> {
    match api.status(&target.panel_url, token).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(
                server = %target.name,
                panel = %target.panel_url,
                "Failed to fetch panel data: {e}"
            );
            None
        }
    }
}
