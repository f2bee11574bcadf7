//! Rendering of usage snapshots into the status document.
//!
//! Rendering is a pure function of the configured targets and the snapshots
//! of the current cycle: identical input yields byte-identical output.

use serde::Serialize;

use crate::config::Target;
use crate::monitoring::types::{UsageSnapshot, BYTES_PER_GB, BYTES_PER_MB};
use crate::output::controls::{build_controls, Control};

/// Title shown on the status document.
pub const DOCUMENT_TITLE: &str = "Server Monitoring";

/// Green accent colour of the status document.
pub const DOCUMENT_COLOUR: u32 = 0x2ECC71;

/// Upper bound on field blocks (and therefore controls) per document.
pub const MAX_ENTRIES: usize = 25;

/// A named block of text in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral status document: metrics blocks plus reboot controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDocument {
    pub title: String,
    pub colour: u32,
    pub fields: Vec<Field>,
    pub controls: Vec<Control>,
}

/// A target that produced a snapshot this cycle, with its configured index.
#[derive(Debug, Clone, Copy)]
pub struct HealthyTarget<'a> {
    pub index: usize,
    pub target: &'a Target,
    pub snapshot: &'a UsageSnapshot,
}

/// Format seconds as `"<d>d <h>h <m>m <s>s"`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{days}d {hours}h {minutes}m {secs}s")
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

fn gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Render one target's metrics block.
pub fn render_field(target: &Target, usage: &UsageSnapshot) -> Field {
    let sent = gb(usage.net_traffic.sent);
    let recv = gb(usage.net_traffic.recv);

    let value = format!(
        "**IP Address:** {ip}\n\
         **CPU Usage:** {cpu:.2}%\n\
         **Memory Usage:** {mem_cur:.1}/{mem_tot:.1} MB\n\
         **Disk Usage:** {disk_cur:.1}/{disk_tot:.1} GB\n\
         **Uptime:** {uptime}\n\
         **TCP Connections:** {tcp}\n\
         **UDP Connections:** {udp}\n\
         **Network IO (real-time):** TX: {up:.2} MB, RX: {down:.2} MB\n\
         **Total Bandwidth:** Sent: {sent:.2} GB, Received: {recv:.2} GB\n\
         Overall: {total:.2} GB",
        ip = target.host,
        cpu = usage.cpu,
        mem_cur = mb(usage.mem.current),
        mem_tot = mb(usage.mem.total),
        disk_cur = gb(usage.disk.current),
        disk_tot = gb(usage.disk.total),
        uptime = format_uptime(usage.uptime),
        tcp = usage.tcp_count,
        udp = usage.udp_count,
        up = mb(usage.net_io.up),
        down = mb(usage.net_io.down),
        sent = sent,
        recv = recv,
        total = sent + recv,
    );

    Field {
        name: format!("Server: {}", target.name),
        value,
        inline: false,
    }
}

/// Build the full document for one cycle.
///
/// Fields and controls are derived from the same list, so the control set
/// always matches the targets shown.
pub fn build_document(healthy: &[HealthyTarget<'_>]) -> StatusDocument {
    let shown = &healthy[..healthy.len().min(MAX_ENTRIES)];

    let fields = shown
        .iter()
        .map(|h| render_field(h.target, h.snapshot))
        .collect();
    let controls = build_controls(shown.iter().map(|h| (h.index, h.target)));

    StatusDocument {
        title: DOCUMENT_TITLE.to_string(),
        colour: DOCUMENT_COLOUR,
        fields,
        controls,
    }
}
