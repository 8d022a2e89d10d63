//! Remote team directory client
//!
//! The directory exposes two endpoints:
//! - `GET {base}/teams/{number}`
//! - `GET {base}/teams/{number}/quick-stats?season={n}`
//!
//! Both answer 404 when the record does not exist.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{DirectoryError, QuickStats, StatLine, TeamInfo};
use crate::config::DirectorySettings;

/// Environment variable that disables all network lookups when set to a
/// truthy value (`1`, `true`, `yes`, `on`)
pub const OFFLINE_ENV: &str = "TEAM_LENS_OFFLINE";

/// Interpret an `OFFLINE_ENV` value
pub fn offline_requested(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => matches!(v.as_str(), "1" | "true" | "yes" | "on"),
        None => false,
    }
}

/// Transport seam for directory lookups
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn fetch_team(&self, number: &str) -> Result<TeamInfo, DirectoryError>;

    async fn fetch_quick_stats(
        &self,
        number: &str,
        season: Option<u32>,
    ) -> Result<QuickStats, DirectoryError>;
}

/// HTTP client for the team directory REST API
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: Url,
    offline: bool,
}

impl HttpDirectoryClient {
    /// Create a client from directory settings
    pub fn new(settings: &DirectorySettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid directory base URL: {}", settings.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Directory base URL cannot be a base: {}", settings.base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            offline: offline_requested(std::env::var(OFFLINE_ENV).ok().as_deref()),
        })
    }

    /// Force offline mode regardless of the environment
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn team_url(&self, number: &str) -> Url {
        self.endpoint(&["teams", number])
    }

    pub fn quick_stats_url(&self, number: &str, season: Option<u32>) -> Url {
        let mut url = self.endpoint(&["teams", number, "quick-stats"]);
        if let Some(season) = season {
            url.query_pairs_mut().append_pair("season", &season.to_string());
        }
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DirectoryError> {
        if self.offline {
            return Err(DirectoryError::Offline);
        }

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn fetch_team(&self, number: &str) -> Result<TeamInfo, DirectoryError> {
        let body: TeamResponse = self.get_json(self.team_url(number)).await?;
        Ok(body.into())
    }

    async fn fetch_quick_stats(
        &self,
        number: &str,
        season: Option<u32>,
    ) -> Result<QuickStats, DirectoryError> {
        let body: QuickStatsResponse = self.get_json(self.quick_stats_url(number, season)).await?;
        Ok(body.into())
    }
}

/// Map a response status to an error, or `None` on success
pub fn classify_status(status: StatusCode) -> Option<DirectoryError> {
    if status == StatusCode::NOT_FOUND {
        Some(DirectoryError::NotFound)
    } else if !status.is_success() {
        Some(DirectoryError::Status(status.as_u16()))
    } else {
        None
    }
}

/// Team numbers arrive as integers from the live API but as strings from some mirrors
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberField {
    Int(u64),
    Text(String),
}

impl From<NumberField> for String {
    fn from(value: NumberField) -> Self {
        match value {
            NumberField::Int(n) => n.to_string(),
            NumberField::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TeamResponse {
    number: NumberField,
    name: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl From<TeamResponse> for TeamInfo {
    fn from(body: TeamResponse) -> Self {
        TeamInfo {
            number: body.number.into(),
            name: body.name,
            city: body.city,
            state: body.state,
            country: body.country,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatResponse {
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    rank: Option<u32>,
}

impl From<Option<StatResponse>> for StatLine {
    fn from(stat: Option<StatResponse>) -> Self {
        let stat = stat.unwrap_or_default();
        StatLine {
            value: stat.value.unwrap_or(0.0),
            rank: stat.rank.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuickStatsResponse {
    #[serde(default)]
    tot: Option<StatResponse>,
    #[serde(default)]
    auto: Option<StatResponse>,
    #[serde(default)]
    dc: Option<StatResponse>,
    #[serde(default)]
    eg: Option<StatResponse>,
}

impl From<QuickStatsResponse> for QuickStats {
    fn from(body: QuickStatsResponse) -> Self {
        QuickStats {
            total: body.tot.into(),
            auto: body.auto.into(),
            driver_controlled: body.dc.into(),
            endgame: body.eg.into(),
        }
    }
}
