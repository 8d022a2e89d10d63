//! In-memory directory cache and its persisted form
//!
//! Persisted as two flat JSON objects:
//! - team cache: `number -> TeamInfo | null`, where null records a confirmed absence
//! - stats cache: `"{number}-{season|current}" -> QuickStats`

use std::collections::{BTreeMap, HashMap};

use super::{QuickStats, TeamInfo};

/// Store key for the team cache blob
pub const TEAM_CACHE_KEY: &str = "team_cache";
/// Store key for the stats cache blob
pub const STATS_CACHE_KEY: &str = "stats_cache";

/// Known state of a team number
#[derive(Debug, Clone, PartialEq)]
pub enum TeamEntry {
    Found(TeamInfo),
    /// The directory confirmed this number does not exist
    NotFound,
}

impl TeamEntry {
    pub fn into_option(self) -> Option<TeamInfo> {
        match self {
            TeamEntry::Found(team) => Some(team),
            TeamEntry::NotFound => None,
        }
    }
}

/// Composite stats cache key
pub fn stats_key(number: &str, season: Option<u32>) -> String {
    match season {
        Some(season) => format!("{}-{}", number, season),
        None => format!("{}-current", number),
    }
}

/// Process-lifetime cache of directory answers. Entries never expire.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCache {
    teams: HashMap<String, TeamEntry>,
    stats: HashMap<String, QuickStats>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self, number: &str) -> Option<&TeamEntry> {
        self.teams.get(number)
    }

    pub fn insert_team(&mut self, number: impl Into<String>, entry: TeamEntry) {
        self.teams.insert(number.into(), entry);
    }

    pub fn stats(&self, key: &str) -> Option<&QuickStats> {
        self.stats.get(key)
    }

    pub fn insert_stats(&mut self, key: impl Into<String>, stats: QuickStats) {
        self.stats.insert(key.into(), stats);
    }

    pub fn clear(&mut self) {
        self.teams.clear();
        self.stats.clear();
    }

    /// Number of known teams
    pub fn found_count(&self) -> usize {
        self.teams
            .values()
            .filter(|e| matches!(e, TeamEntry::Found(_)))
            .count()
    }

    /// Number of confirmed-absent numbers
    pub fn not_found_count(&self) -> usize {
        self.teams
            .values()
            .filter(|e| matches!(e, TeamEntry::NotFound))
            .count()
    }

    pub fn stats_count(&self) -> usize {
        self.stats.len()
    }

    /// Serialize the team cache (sorted keys for stable output)
    pub fn encode_teams(&self) -> serde_json::Result<String> {
        let flat: BTreeMap<&str, Option<&TeamInfo>> = self
            .teams
            .iter()
            .map(|(number, entry)| {
                let team = match entry {
                    TeamEntry::Found(team) => Some(team),
                    TeamEntry::NotFound => None,
                };
                (number.as_str(), team)
            })
            .collect();
        serde_json::to_string(&flat)
    }

    /// Serialize the stats cache (sorted keys for stable output)
    pub fn encode_stats(&self) -> serde_json::Result<String> {
        let flat: BTreeMap<&str, &QuickStats> =
            self.stats.iter().map(|(k, v)| (k.as_str(), v)).collect();
        serde_json::to_string(&flat)
    }

    /// Replace the team cache with a persisted blob
    pub fn load_teams(&mut self, blob: &str) -> serde_json::Result<()> {
        let flat: HashMap<String, Option<TeamInfo>> = serde_json::from_str(blob)?;
        self.teams = flat
            .into_iter()
            .map(|(number, team)| {
                let entry = match team {
                    Some(team) => TeamEntry::Found(team),
                    None => TeamEntry::NotFound,
                };
                (number, entry)
            })
            .collect();
        Ok(())
    }

    /// Replace the stats cache with a persisted blob
    pub fn load_stats(&mut self, blob: &str) -> serde_json::Result<()> {
        self.stats = serde_json::from_str(blob)?;
        Ok(())
    }
}
