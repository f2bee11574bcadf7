//! Reboot control construction and activation routing.
//!
//! Controls are plain data; the chat binding turns them into buttons. Each
//! control id carries the configured index of its target so an activation
//! can be routed back without any per-message state.

use serde::Serialize;

use crate::config::Target;

/// Prefix of every reboot control id.
pub const CONTROL_PREFIX: &str = "reboot:";

/// Maximum controls per row on the chat platform.
pub const CONTROLS_PER_ROW: usize = 5;

/// One destructive reboot control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub id: String,
    pub label: String,
}

/// Encode a target index as a control id.
pub fn control_id(index: usize) -> String {
    format!("{CONTROL_PREFIX}{index}")
}

/// Decode a control id back into a target index.
pub fn parse_control_id(id: &str) -> Option<usize> {
    id.strip_prefix(CONTROL_PREFIX)?.parse().ok()
}

/// Build one control per `(index, target)` pair, preserving order.
pub fn build_controls<'a, I>(healthy: I) -> Vec<Control>
where
    I: IntoIterator<Item = (usize, &'a Target)>,
{
    healthy
        .into_iter()
        .map(|(index, target)| Control {
            id: control_id(index),
            label: format!("Reboot {}", target.name),
        })
        .collect()
}

/// Split controls into platform-sized rows.
pub fn control_rows(controls: &[Control]) -> Vec<&[Control]> {
    controls.chunks(CONTROLS_PER_ROW).collect()
}

/// Look up the target an activation refers to.
pub fn resolve_control<'a>(id: &str, targets: &'a [Target]) -> Option<(usize, &'a Target)> {
    let index = parse_control_id(id)?;
    targets.get(index).map(|t| (index, t))
}
