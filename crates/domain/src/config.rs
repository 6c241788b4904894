use crate::error::{Error, Result};
use crate::model::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub compare: CompareConfig,
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Parse `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_path(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Providers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub google: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Google => &self.google,
            ProviderKind::OpenRouter => &self.openrouter,
        }
    }
}

/// Per-provider settings. Unset fields fall back to the provider's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Sent as `HTTP-Referer` by OpenAI-compatible adapters.
    #[serde(default)]
    pub referer: Option<String>,
    /// Sent as `X-Title` by OpenAI-compatible adapters.
    #[serde(default)]
    pub title: Option<String>,
}

impl ProviderConfig {
    pub fn base_url(&self, kind: ProviderKind) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(kind.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Where a provider's credential comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Inline secret. Prefer `env`.
    #[serde(default)]
    pub key: Option<String>,
    /// Environment variable holding the secret. Defaults to the provider's
    /// conventional variable (`GOOGLE_API_KEY`, `OPENROUTER_API_KEY`).
    #[serde(default)]
    pub env: Option<String>,
}

impl AuthConfig {
    pub fn env_var(&self, kind: ProviderKind) -> &str {
        self.env.as_deref().unwrap_or(kind.default_key_env())
    }
}

const DEFAULT_TITLE: &str = "Chorus";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Comparison
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default pause between comparison calls, in milliseconds.
pub const DEFAULT_COMPARE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Pause between consecutive calls of a comparison batch.
    #[serde(default = "d_compare_delay")]
    pub delay_ms: u64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            delay_ms: d_compare_delay(),
        }
    }
}

// ── Default helpers ────────────────────────────────────────────────

fn d_compare_delay() -> u64 {
    DEFAULT_COMPARE_DELAY_MS
}
