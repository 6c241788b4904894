//! Shared utility functions for provider adapters.

use chorus_domain::config::AuthConfig;
use chorus_domain::error::{Error, Result};
use chorus_domain::ProviderKind;

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Transport`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Transport(e.to_string())
    }
}

/// Read the whole response body, turning a non-2xx status into
/// [`Error::Upstream`]. The body is read before the status check so the
/// error carries whatever the provider said.
pub(crate) async fn read_body(resp: reqwest::Response, provider: &str) -> Result<String> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| from_reqwest(e.without_url()))?;

    if !status.is_success() {
        return Err(Error::Upstream {
            provider: provider.to_string(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: text,
        });
    }
    Ok(text)
}

/// Build the shared HTTP client. No timeout is set; the transport default
/// applies.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("chorus/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(from_reqwest)
}

/// Resolve the API key for `kind` from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, warned), unless empty
/// 2. the `env` variable, or the provider's conventional one
///
/// `None` means nothing is configured. Placeholder screening happens in the
/// gate, not here.
pub fn resolve_api_key(auth: &AuthConfig, kind: ProviderKind) -> Option<String> {
    if let Some(key) = auth.key.as_deref().filter(|k| !k.is_empty()) {
        tracing::warn!(
            provider = kind.id(),
            "API key loaded from plaintext config field 'key', prefer 'env'"
        );
        return Some(key.to_string());
    }

    let env_var = auth.env_var(kind);
    match std::env::var(env_var) {
        Ok(val) => Some(val),
        Err(_) => {
            tracing::debug!(provider = kind.id(), env_var, "credential env var not set");
            None
        }
    }
}

/// Redact API key from URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}
