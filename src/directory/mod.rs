//! Team Directory Layer
//!
//! Resolves bare team numbers into identity records and quick stats from the
//! remote team directory, with persistent caching and in-flight
//! de-duplication.

pub mod cache;
pub mod client;
pub mod service;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{stats_key, DirectoryCache, TeamEntry};
pub use client::{DirectoryClient, HttpDirectoryClient};
pub use service::{CacheSummary, TeamDirectory, TeamLookup};

/// Team identity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// Canonical team number as reported by the directory
    pub number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl TeamInfo {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            city: None,
            state: None,
            country: None,
        }
    }

    /// "City, State, Country" with missing parts left out
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// One (score, rank) pair. Rank 0 means unranked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub value: f64,
    pub rank: u32,
}

impl StatLine {
    pub fn new(value: f64, rank: u32) -> Self {
        Self { value, rank }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }

    /// Ordinal rank ("3rd"), or "unranked"
    pub fn rank_label(&self) -> String {
        if self.is_ranked() {
            ordinal(self.rank)
        } else {
            "unranked".to_string()
        }
    }

    pub fn value_label(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Season performance summary
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuickStats {
    pub total: StatLine,
    pub auto: StatLine,
    pub driver_controlled: StatLine,
    pub endgame: StatLine,
}

impl QuickStats {
    /// Labelled rows in display order
    pub fn rows(&self) -> [(&'static str, StatLine); 4] {
        [
            ("Total OPR", self.total),
            ("Auto OPR", self.auto),
            ("Driver Controlled OPR", self.driver_controlled),
            ("Endgame OPR", self.endgame),
        ]
    }
}

/// Errors from a single directory request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    /// The directory confirmed the record does not exist (HTTP 404)
    #[error("not found")]
    NotFound,
    /// Any other non-success status
    #[error("HTTP error status {0}")]
    Status(u16),
    /// Connection, timeout, or other transport failure
    #[error("request failed: {0}")]
    Transport(String),
    /// Response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Network access is disabled
    #[error("offline mode: network lookups disabled")]
    Offline,
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound)
    }
}

/// English ordinal for a positive integer: 1st, 2nd, 3rd, 4th, 11th, 21st
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Substitute the team number into a page URL template (`{TEAM}` placeholder)
pub fn team_page_url(template: &str, number: &str) -> String {
    template.replace("{TEAM}", number)
}
