//! Shared test utilities for panelwatch core integration tests.
//!
//! Provides an in-process fake 3x-ui panel served by `axum`, a TCP
//! reachability check for the optional SSH container, and target builders.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use panelwatch_core::config::Target;
use serde_json::json;

/// Username accepted by the fake panel.
pub const PANEL_USER: &str = "admin";
/// Password accepted by the fake panel.
pub const PANEL_PASSWORD: &str = "s3cret";
/// Session token handed out by the fake panel.
pub const PANEL_TOKEN: &str = "MTcwMDAwMDAwMHxEdi1CQkFFQ180SUFBUkFCRUFBQQ";

/// ssh-password container (password auth), started separately.
pub const PORT_SSH_PASSWORD: u16 = 2201;

/// Check if a TCP port is reachable on the given host.
pub fn is_port_reachable(host: &str, port: u16) -> bool {
    let addr = format!("{host}:{port}");
    if let Ok(addr) = addr.parse() {
        TcpStream::connect_timeout(&addr, Duration::from_secs(2)).is_ok()
    } else {
        false
    }
}

/// Skip the current test if the SSH container is not reachable.
macro_rules! require_ssh_container {
    ($port:expr) => {
        if !common::is_port_reachable("127.0.0.1", $port) {
            eprintln!(
                "SKIPPED: SSH test container not reachable on port {}",
                $port
            );
            return;
        }
    };
}
pub(crate) use require_ssh_container;

/// Request counters shared with the fake panel handlers.
#[derive(Clone, Default)]
pub struct PanelCounters {
    pub logins: Arc<AtomicUsize>,
    pub status_calls: Arc<AtomicUsize>,
}

impl PanelCounters {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

/// Status body matching what a 3x-ui panel returns.
pub fn status_body() -> serde_json::Value {
    json!({
        "success": true,
        "msg": "",
        "obj": {
            "cpu": 23.456,
            "cpuCores": 4,
            "mem": {"current": 1073741824u64, "total": 4294967296u64},
            "swap": {"current": 0, "total": 0},
            "disk": {"current": 21474836480u64, "total": 85899345920u64},
            "xray": {"state": "running", "errorMsg": "", "version": "1.8.6"},
            "uptime": 90061,
            "loads": [0.05, 0.1, 0.12],
            "tcpCount": 128,
            "udpCount": 16,
            "netIO": {"up": 524288, "down": 3145728},
            "netTraffic": {"sent": 5368709120u64, "recv": 10737418240u64}
        }
    })
}

async fn login_ok(
    State(counters): State<PanelCounters>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    counters.logins.fetch_add(1, Ordering::SeqCst);
    let user_ok = form.get("username").map(String::as_str) == Some(PANEL_USER);
    let pass_ok = form.get("password").map(String::as_str) == Some(PANEL_PASSWORD);
    if user_ok && pass_ok {
        (
            [(
                header::SET_COOKIE,
                format!("3x-ui={PANEL_TOKEN}; Path=/; HttpOnly"),
            )],
            Json(json!({"success": true, "msg": "Login Successfully", "obj": null})),
        )
            .into_response()
    } else {
        Json(json!({"success": false, "msg": "Invalid username or password", "obj": null}))
            .into_response()
    }
}

async fn status_ok(State(counters): State<PanelCounters>, headers: HeaderMap) -> Response {
    counters.status_calls.fetch_add(1, Ordering::SeqCst);
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if cookie != format!("3x-ui={PANEL_TOKEN}") {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(status_body()).into_response()
}

async fn login_without_cookie(State(counters): State<PanelCounters>) -> Response {
    counters.logins.fetch_add(1, Ordering::SeqCst);
    Json(json!({"success": true, "msg": "Login Successfully"})).into_response()
}

async fn garbage() -> Response {
    (StatusCode::OK, "<html><body>maintenance</body></html>").into_response()
}

async fn server_error() -> Response {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(status_body()).into_response()
}

/// Start the fake panel and return its base URL and counters.
///
/// Several panel personalities are mounted under prefixes; use
/// `format!("{base}/ok")` etc. as the panel URL:
/// - `/ok`: well-behaved panel
/// - `/nocookie`: login succeeds but sets no session cookie
/// - `/garbage`: answers HTML instead of JSON
/// - `/down`: answers 500
/// - `/slow`: takes five seconds on every call
pub async fn spawn_fake_panel() -> (String, PanelCounters) {
    let counters = PanelCounters::default();

    let app = Router::new()
        .route("/ok/login", post(login_ok))
        .route("/ok/server/status", post(status_ok))
        .route("/nocookie/login", post(login_without_cookie))
        .route("/nocookie/server/status", post(status_ok))
        .route("/garbage/login", post(garbage))
        .route("/garbage/server/status", post(garbage))
        .route("/down/login", post(server_error))
        .route("/down/server/status", post(server_error))
        .route("/slow/login", post(slow))
        .route("/slow/server/status", post(slow))
        .with_state(counters.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake panel");
    let addr = listener.local_addr().expect("fake panel address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{addr}"), counters)
}

/// Return a local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    listener.local_addr().expect("probe address").port()
}

/// Build a target pointing at `panel_url` with the fake panel's credentials.
pub fn target(name: &str, host: &str, panel_url: &str) -> Target {
    Target {
        name: name.to_string(),
        host: host.to_string(),
        ssh_user: "testuser".to_string(),
        ssh_password: "testpass".to_string(),
        panel_url: panel_url.to_string(),
        panel_user: PANEL_USER.to_string(),
        panel_password: PANEL_PASSWORD.to_string(),
    }
}
