//! Model catalog.
//!
//! The catalog is a fixed, ordered list of the models chorus knows how to
//! reach. It carries no behavior: availability filtering belongs to the
//! credential gate, which consults the catalog to learn which model ids a
//! provider serves. Catalog order doubles as preference order.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Providers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hosted backends, one per wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini `generateContent`.
    Google,
    /// OpenRouter, OpenAI-compatible chat completions.
    OpenRouter,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Google, ProviderKind::OpenRouter];

    /// Stable lowercase identifier used in config and logs.
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    /// Human-facing provider name shown next to each model.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Google => "Google",
            ProviderKind::OpenRouter => "OpenRouter",
        }
    }

    /// The documentation value shipped in example env files. A credential
    /// equal to this literal counts as not configured.
    pub fn placeholder_key(self) -> &'static str {
        match self {
            ProviderKind::Google => "your_google_gemini_api_key_here",
            ProviderKind::OpenRouter => "your_openrouter_api_key_here",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Google => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Environment variable read for the credential when config names none.
    pub fn default_key_env(self) -> &'static str {
        match self {
            ProviderKind::Google => "GOOGLE_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// True when `secret` is usable: non-empty and not the placeholder.
    pub fn accepts_key(self, secret: &str) -> bool {
        !secret.is_empty() && secret != self.placeholder_key()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| {
                s.eq_ignore_ascii_case(kind.id()) || s.eq_ignore_ascii_case(kind.display_name())
            })
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A known backend model. Identity is `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Identifier sent to the provider (e.g. `deepseek/deepseek-chat`).
    pub id: &'static str,
    pub display_name: &'static str,
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_tier_note: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl ModelDescriptor {
    pub fn provider_name(&self) -> &'static str {
        self.provider.display_name()
    }
}

static CATALOG: [ModelDescriptor; 2] = [
    ModelDescriptor {
        id: "gemini-1.5-flash",
        display_name: "Gemini 1.5 Flash",
        provider: ProviderKind::Google,
        free_tier_note: Some("15 req/min, 1500/day"),
        description: Some("Fast, excellent for most tasks"),
    },
    ModelDescriptor {
        id: "deepseek/deepseek-chat",
        display_name: "DeepSeek Chat",
        provider: ProviderKind::OpenRouter,
        free_tier_note: Some("$1 credit"),
        description: Some("Great coding assistant"),
    },
];

/// Every known model, in preference order.
pub fn catalog() -> &'static [ModelDescriptor] {
    &CATALOG
}

/// Look up a catalog entry by model id.
pub fn find(model_id: &str) -> Option<&'static ModelDescriptor> {
    CATALOG.iter().find(|m| m.id == model_id)
}

/// Model ids served by `provider`, in catalog order.
pub fn models_for(provider: ProviderKind) -> impl Iterator<Item = &'static ModelDescriptor> {
    CATALOG.iter().filter(move |m| m.provider == provider)
}
