//! Optional RON configuration file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! built-in sources, 15 s request timeout and a 1600 character message budget.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use jobcast_core::{
    MessageComposer, SourceDescriptor, SourceRegistry, DEFAULT_FOOTER, DEFAULT_MESSAGE_LIMIT,
};
use jobcast_engine::FetchSettings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "jobcast.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub message_limit: usize,
    pub footer: String,
    /// Replace the built-in descriptor of each listed category.
    pub sources: Vec<SourceDescriptor>,
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            footer: DEFAULT_FOOTER.to_string(),
            sources: Vec::new(),
            log_to_file: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_ms: settings.connect_timeout.as_millis() as u64,
            request_timeout_ms: settings.request_timeout.as_millis() as u64,
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
            user_agent: settings.user_agent,
            accept_language: settings.accept_language,
        }
    }
}

impl FetchConfig {
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            ..FetchSettings::default()
        }
    }
}

impl AppConfig {
    /// Load `path`, or `./jobcast.ron` when no path is given and that file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(text)?;
        anyhow::ensure!(config.message_limit > 0, "message_limit must be positive");
        anyhow::ensure!(
            config.fetch.request_timeout_ms > 0,
            "request_timeout_ms must be positive"
        );
        Ok(config)
    }

    pub fn registry(&self) -> SourceRegistry {
        SourceRegistry::with_overrides(self.sources.iter().cloned())
    }

    pub fn composer(&self) -> MessageComposer {
        MessageComposer::new(self.message_limit, self.footer.clone())
    }
}
