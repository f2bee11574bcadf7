//! Wire types for the panel login and status endpoints.

use serde::{Deserialize, Serialize};

/// Bytes per mebibyte, used for memory and real-time network rates.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes per gibibyte, used for disk and cumulative traffic.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A `current / total` pair in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub current: u64,
    pub total: u64,
}

/// Instantaneous network throughput in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetIo {
    pub up: u64,
    pub down: u64,
}

/// Cumulative traffic counters in bytes since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetTraffic {
    pub sent: u64,
    pub recv: u64,
}

/// Resource usage reported by a panel's status endpoint.
///
/// Values are kept in the units the panel reports (percent, bytes, seconds);
/// conversion happens only when rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    #[serde(default)]
    pub cpu: f64,
    pub mem: Usage,
    pub disk: Usage,
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub tcp_count: u64,
    #[serde(default)]
    pub udp_count: u64,
    #[serde(rename = "netIO")]
    pub net_io: NetIo,
    pub net_traffic: NetTraffic,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
}

/// Body of `POST /server/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    pub obj: Option<UsageSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_STATUS: &str = r#"{
        "success": true,
        "msg": "",
        "obj": {
            "cpu": 12.5,
            "cpuCores": 2,
            "mem": {"current": 536870912, "total": 2147483648},
            "swap": {"current": 0, "total": 0},
            "disk": {"current": 10737418240, "total": 42949672960},
            "xray": {"state": "running", "version": "1.8.4"},
            "uptime": 90061,
            "loads": [0.1, 0.2, 0.3],
            "tcpCount": 42,
            "udpCount": 7,
            "netIO": {"up": 1048576, "down": 2097152},
            "netTraffic": {"sent": 1073741824, "recv": 3221225472}
        }
    }"#;

    #[test]
    fn parses_panel_status_body() {
        let resp: StatusResponse = serde_json::from_str(SAMPLE_STATUS).unwrap();
        assert!(resp.success);

        let snap = resp.obj.unwrap();
        assert!((snap.cpu - 12.5).abs() < f64::EPSILON);
        assert_eq!(snap.mem.current, 536870912);
        assert_eq!(snap.disk.total, 42949672960);
        assert_eq!(snap.uptime, 90061);
        assert_eq!(snap.tcp_count, 42);
        assert_eq!(snap.udp_count, 7);
        assert_eq!(snap.net_io, NetIo { up: 1048576, down: 2097152 });
        assert_eq!(snap.net_traffic.recv, 3221225472);
    }

    #[test]
    fn missing_success_flag_is_false() {
        let resp: LoginResponse = serde_json::from_str(r#"{"msg": "bad"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn status_without_required_block_fails_to_parse() {
        let body = r#"{"success": true, "obj": {"cpu": 1.0, "mem": {"current": 1, "total": 2}}}"#;
        assert!(serde_json::from_str::<StatusResponse>(body).is_err());
    }

    #[test]
    fn snapshot_serializes_with_panel_field_names() {
        let json = serde_json::to_string(&UsageSnapshot::default()).unwrap();
        assert!(json.contains("\"netIO\""));
        assert!(json.contains("\"netTraffic\""));
        assert!(json.contains("\"tcpCount\""));
        assert!(json.contains("\"udpCount\""));
    }
}
