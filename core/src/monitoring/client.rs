//! HTTP implementation of [`PanelApi`] for 3x-ui style panels.
//!
//! Login posts a form and receives the session as a `3x-ui` cookie. The
//! status call sends that cookie back explicitly; the client keeps no cookie
//! jar of its own so sessions for different panels never mix.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::StatusCode;
use tracing::debug;

use crate::errors::PanelError;
use crate::monitoring::provider::PanelApi;
use crate::monitoring::types::{LoginResponse, StatusResponse, UsageSnapshot};

/// Name of the cookie carrying the panel session.
pub const SESSION_COOKIE: &str = "3x-ui";

const STATUS_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const STATUS_ACCEPT: &str = "application/json, text/plain, */*";

/// Panel client backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpPanelClient {
    http: reqwest::Client,
}

impl HttpPanelClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PanelError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

fn check_status(status: StatusCode) -> Result<(), PanelError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(PanelError::Status(status.as_u16()))
    }
}

#[async_trait::async_trait]
impl PanelApi for HttpPanelClient {
    async fn login(
        &self,
        panel_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, PanelError> {
        let url = format!("{panel_url}/login");
        debug!(url = %url, "Logging into panel");

        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        check_status(response.status())?;

        let cookie = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string());

        let body = response.text().await?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| PanelError::Malformed(e.to_string()))?;
        if !parsed.success {
            return Err(PanelError::Rejected);
        }

        cookie
            .filter(|c| !c.is_empty())
            .ok_or(PanelError::MissingCookie)
    }

    async fn status(&self, panel_url: &str, token: &str) -> Result<UsageSnapshot, PanelError> {
        let url = format!("{panel_url}/server/status");
        debug!(url = %url, "Fetching panel status");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, STATUS_CONTENT_TYPE)
            .header(ACCEPT, STATUS_ACCEPT)
            .header(COOKIE, format!("{SESSION_COOKIE}={token}"))
            .send()
            .await?;
        check_status(response.status())?;

        let body = response.text().await?;
        let parsed: StatusResponse =
            serde_json::from_str(&body).map_err(|e| PanelError::Malformed(e.to_string()))?;
        if !parsed.success {
            return Err(PanelError::Rejected);
        }
        parsed
            .obj
            .ok_or_else(|| PanelError::Malformed("status body has no obj".to_string()))
    }
}
