//! Panel polling: wire types, the panel API seam, the HTTP client,
//! session caching and per-target usage collection.

pub mod client;
pub mod collector;
pub mod provider;
pub mod session;
pub mod types;

pub use client::{HttpPanelClient, SESSION_COOKIE};
pub use collector::collect_usage;
pub use provider::PanelApi;
pub use session::SessionCache;
pub use types::{NetIo, NetTraffic, Usage, UsageSnapshot, BYTES_PER_GB, BYTES_PER_MB};
