use crate::error::{IdeaError, Result};
use serde::{de::Deserializer, Deserialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const CONFIG_PATH_ENV: &str = "IDEAFORGE_CONFIG";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Tried in order; the first one the backend recognises is used.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
    "models/gemini-1.5-flash",
];

const DEFAULT_CONFIG: &str = r#"# ideaforge configuration
#
# The API key is never read from this file. Set GEMINI_API_KEY or pass --api-key.

[backend]
api_base = "https://generativelanguage.googleapis.com/v1beta"
# Overall request timeout. Unset means the transport default.
# timeout_secs = 60

[models]
# Tried in order; the first model the API knows about is used.
candidates = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro", "models/gemini-1.5-flash"]
"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub models: ModelSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_candidates", deserialize_with = "deserialize_candidates")]
    pub candidates: Vec<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_candidates() -> Vec<String> {
    DEFAULT_MODEL_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateOneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_candidates<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = CandidateOneOrMany::deserialize(deserializer)?;
    Ok(match v {
        CandidateOneOrMany::One(m) => vec![m],
        CandidateOneOrMany::Many(vs) => vs,
    })
}

/// Everything the HTTP backend needs, owned by the backend for its whole lifetime.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_base: Url,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    pub fn from_settings(settings: &BackendSettings, api_key: String) -> Result<Self> {
        Ok(Self {
            api_base: parse_api_base(&settings.api_base)?,
            api_key,
            timeout: settings.timeout_secs.map(Duration::from_secs),
        })
    }
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| IdeaError::Config(format!("invalid api_base '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(IdeaError::Config(format!(
            "api_base '{}' must use http or https",
            raw
        )));
    }
    Ok(url)
}

/// Pick the first non-blank key: the explicit one, then the environment value.
pub fn resolve_api_key(explicit: Option<String>, env_value: Option<String>) -> Result<String> {
    explicit
        .into_iter()
        .chain(env_value)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or_else(|| {
            IdeaError::Config(format!(
                "API key is required. Set {} environment variable or pass an API key.",
                API_KEY_ENV
            ))
        })
}

impl Settings {
    /// `IDEAFORGE_CONFIG` first, then the user config file.
    pub fn load_auto() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load(&path);
            } else {
                tracing::warn!(
                    "{} points to non-existent file: {}",
                    CONFIG_PATH_ENV,
                    path.display()
                );
            }
        }

        Self::load_from_user_config()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        parse_api_base(&self.backend.api_base)?;
        if let Some(blank) = self.models.candidates.iter().find(|c| c.trim().is_empty()) {
            return Err(IdeaError::Config(format!(
                "model candidate '{}' is blank",
                blank
            )));
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(
            Path::new(&home)
                .join(".config")
                .join("ideaforge")
                .join("config.toml"),
        )
    }

    fn load_from_user_config() -> Result<Self> {
        let Some(path) = Self::user_config_path() else {
            tracing::debug!("HOME not set, using built-in configuration");
            return Ok(Self::default());
        };

        if path.exists() {
            return Self::load(&path);
        }

        if let Err(e) = Self::write_default_config(&path) {
            tracing::warn!(
                "Could not write default config to {}: {}",
                path.display(),
                e
            );
        }
        Ok(Self::default())
    }

    fn write_default_config(path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, DEFAULT_CONFIG)?;
        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    pub fn default_config_text() -> &'static str {
        DEFAULT_CONFIG
    }
}
