//! Runtime configuration
//!
//! Everything is read from environment variables; paths default to a `data/`
//! directory next to the project root.

use std::path::{Path, PathBuf};

use crate::lookup::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

pub const DATABASE_PATH_VAR: &str = "NUTRACK_DATABASE_PATH";
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const LOOKUP_URL_VAR: &str = "NUTRACK_LOOKUP_URL";
pub const LOOKUP_MODEL_VAR: &str = "NUTRACK_LOOKUP_MODEL";
pub const CHART_DIR_VAR: &str = "NUTRACK_CHART_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub chart_dir: PathBuf,
    /// Default lookup credential, used when a tool call doesn't supply one
    pub api_key: Option<String>,
    pub lookup_url: String,
    pub lookup_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let database_path = var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("nutrack.db"));

        let chart_dir = var(CHART_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_chart_dir(&database_path));

        Self {
            database_path,
            chart_dir,
            api_key: var(API_KEY_VAR),
            lookup_url: var(LOOKUP_URL_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            lookup_model: var(LOOKUP_MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Credential for a lookup: the explicit one if given, else the configured key
    pub fn credential<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
            .unwrap_or("")
    }
}

/// `<project>/data`, found from the executable location
fn data_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path
}

fn default_chart_dir(database_path: &Path) -> PathBuf {
    database_path
        .parent()
        .map(|p| p.join("charts"))
        .unwrap_or_else(|| PathBuf::from("charts"))
}
