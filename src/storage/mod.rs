//! Storage Layer
//!
//! Platform directories and the key-value blob stores backing the
//! directory cache.

pub mod store;

use anyhow::Result;
use std::path::PathBuf;

pub use store::{CacheStore, FileStore, MemoryStore};

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "teamlens", "TeamLens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Get the cache directory, honouring an explicit override
pub fn get_cache_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let cache_dir = match override_dir {
        Some(dir) => dir.clone(),
        None => project_dirs()?.cache_dir().to_path_buf(),
    };
    std::fs::create_dir_all(&cache_dir)?;

    Ok(cache_dir)
}
