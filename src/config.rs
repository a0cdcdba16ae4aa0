//! Grechen configuration.
//!
//! Loaded from `~/.grechen/config.toml`. Every key is optional and a missing
//! file means defaults. The data directory and extraction provider are
//! resolved through a chain:
//!
//! 1. `--data-dir` / `--provider`: explicit per-command override
//! 2. `GRECHEN_DATA_DIR` / `GRECHEN_LLM_PROVIDER`: process/session level
//! 3. `data-dir` / `provider` in the config file
//! 4. `~/.grechen` / `gemini`
//!
//! The Gemini API key comes from `GEMINI_API_KEY`, falling back to
//! `gemini-api-key` in the config file.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{extract::DEFAULT_GEMINI_MODEL, patterns::DEFAULT_MAX_QUESTIONS, storage::Storage};

const DATA_DIR_ENV: &str = "GRECHEN_DATA_DIR";
const PROVIDER_ENV: &str = "GRECHEN_LLM_PROVIDER";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Which extractor turns free text into candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Mock,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown provider {other:?} (expected gemini or mock)")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,

    /// Days in the rolling baseline.
    pub window_days: usize,

    /// Cap on questions surfaced by `goodnight`.
    pub max_questions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            provider: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
            window_days: 7,
            max_questions: DEFAULT_MAX_QUESTIONS,
        }
    }
}

impl Config {
    /// Load config from `~/.grechen/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`. A missing file is not an error; an
    /// unreadable or invalid one is.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.grechen/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Storage::default_root().map(|root| root.join("config.toml"))
    }

    /// Resolve the data directory from the chain.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, String> {
        self.data_dir_from(explicit, env_var(DATA_DIR_ENV))
    }

    /// Resolve the extraction provider from the chain.
    pub fn resolve_provider(&self, explicit: Option<Provider>) -> Result<Provider, String> {
        self.provider_from(explicit, env_var(PROVIDER_ENV))
    }

    /// Resolve the Gemini API key: environment, then config file.
    pub fn resolve_gemini_api_key(&self) -> Option<String> {
        self.api_key_from(env_var(API_KEY_ENV))
    }

    fn api_key_from(&self, env: Option<String>) -> Option<String> {
        env.or_else(|| self.gemini_api_key.clone().filter(|k| !k.is_empty()))
    }

    fn data_dir_from(&self, explicit: Option<&Path>, env: Option<String>) -> Result<PathBuf, String> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = env {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Storage::default_root()
            .ok_or_else(|| "could not determine home directory; pass --data-dir".to_string())
    }

    fn provider_from(&self, explicit: Option<Provider>, env: Option<String>) -> Result<Provider, String> {
        if let Some(provider) = explicit {
            return Ok(provider);
        }
        if let Some(value) = env {
            return value.parse();
        }
        Ok(self.provider.unwrap_or_default())
    }
}

/// A set, non-empty environment variable.
fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
