//! OpenAI-compatible adapter.
//!
//! Speaks the chat completions contract used by OpenRouter (and any other
//! endpoint that follows it). Roles pass through unchanged, including
//! `system`.

use crate::traits::{LlmProvider, MAX_OUTPUT_TOKENS, NO_RESPONSE, TEMPERATURE};
use crate::util::{from_reqwest, http_client, read_body};
use chorus_domain::config::ProviderConfig;
use chorus_domain::error::Result;
use chorus_domain::message::{ChatMessage, ChatResult, Usage};
use chorus_domain::ProviderKind;
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A chat adapter for any OpenAI-compatible endpoint.
pub struct OpenAiCompatProvider {
    kind: ProviderKind,
    base_url: String,
    api_key: String,
    /// Optional `HTTP-Referer` attribution header (OpenRouter rankings).
    referer: Option<String>,
    /// Optional `X-Title` attribution header.
    title: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        kind: ProviderKind,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            referer: None,
            title: None,
            client: http_client()?,
        })
    }

    /// Create a provider bound to `api_key` from the provider config.
    pub fn from_config(kind: ProviderKind, cfg: &ProviderConfig, api_key: &str) -> Result<Self> {
        let mut provider = Self::new(kind, cfg.base_url(kind), api_key)?;
        provider.referer = cfg.referer.clone();
        provider.title = Some(cfg.title().to_string());
        Ok(provider)
    }

    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    // ── Internal: build authenticated request builder ──────────────

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if let Some(ref referer) = self.referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.title {
            req = req.header("X-Title", title);
        }
        req
    }
}

// Manual Debug impl to avoid leaking the key.
impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / response helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn build_chat_body(messages: &[ChatMessage], model: &str) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        })
        .collect();

    serde_json::json!({
        "model": model,
        "messages": messages,
        "max_tokens": MAX_OUTPUT_TOKENS,
        "temperature": TEMPERATURE,
    })
}

pub(crate) fn parse_chat_response(body: &Value, model: &str) -> ChatResult {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string();

    ChatResult {
        content,
        model_id: model.to_string(),
        usage: body.get("usage").and_then(parse_openai_usage),
    }
}

fn parse_openai_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        prompt_tokens: u32::try_from(v.get("prompt_tokens")?.as_u64()?).ok()?,
        completion_tokens: u32::try_from(v.get("completion_tokens")?.as_u64()?).ok()?,
        total_tokens: u32::try_from(v.get("total_tokens")?.as_u64()?).ok()?,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_chat_body(messages, model);

        tracing::debug!(provider = %self.kind.id(), url = %url, "openai_compat chat request");

        let resp = self
            .authed_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let resp_text = read_body(resp, self.kind.display_name()).await?;
        let resp_json: Value = serde_json::from_str(&resp_text)?;
        Ok(parse_chat_response(&resp_json, model))
    }

    fn provider_id(&self) -> &str {
        self.kind.id()
    }
}
