//! Runtime configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::storage::DEFAULT_STORAGE_KEY;

/// Base URL of the question-answering service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Model identifier sent with every question.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Directory name under the platform data directory.
const DATA_DIR_NAME: &str = "newschat";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service base URL; questions go to `{api_base_url}/news-chat`.
    pub api_base_url: String,
    /// Model identifier passed through to the service.
    pub model: String,
    /// Directory holding the chat blob.
    pub data_dir: PathBuf,
    /// Key the chat collection is stored under.
    pub storage_key: String,
}

impl Config {
    /// Build a config, filling unset values with defaults.
    pub fn resolve(
        api_base_url: Option<String>,
        model: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self {
            api_base_url: api_base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            data_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        })
    }
}

/// `<platform data dir>/newschat`.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not find a data directory for this platform")?;
    Ok(base.join(DATA_DIR_NAME))
}
