//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API. Auth is via an API key passed
//! as a query parameter (`key={api_key}`).
//!
//! Gemini has no system role: system text is folded into the first
//! remaining turn, and `assistant` turns are sent as `model`.

use crate::traits::{LlmProvider, MAX_OUTPUT_TOKENS, NO_RESPONSE, TEMPERATURE};
use crate::util::{from_reqwest, http_client, read_body, redact_url_key};
use chorus_domain::config::ProviderConfig;
use chorus_domain::error::Result;
use chorus_domain::message::{ChatMessage, ChatResult, Role, Usage};
use chorus_domain::ProviderKind;
use serde_json::Value;

/// Label used in upstream error messages.
const ERROR_LABEL: &str = "Gemini";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A chat adapter for the Google Gemini API.
pub struct GoogleProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: http_client()?,
        })
    }

    /// Create a provider bound to `api_key` from the provider config.
    pub fn from_config(cfg: &ProviderConfig, api_key: &str) -> Result<Self> {
        Self::new(cfg.base_url(ProviderKind::Google), api_key)
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

// Manual Debug impl to avoid leaking the key.
impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        _ => "user",
    }
}

pub(crate) fn build_body(messages: &[ChatMessage]) -> Value {
    let mut turns: Vec<(&'static str, String)> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| (gemini_role(m.role), m.content.clone()))
        .collect();

    // Only the first system message is folded; with nothing to attach to it
    // is dropped.
    let system = messages.iter().find(|m| m.role == Role::System);
    if let (Some(system), Some((_, first))) = (system, turns.first_mut()) {
        *first = format!("{}\n\n{}", system.content, first);
    }

    let contents: Vec<Value> = turns
        .into_iter()
        .map(|(role, text)| {
            serde_json::json!({
                "role": role,
                "parts": [{"text": text}],
            })
        })
        .collect();

    serde_json::json!({
        "contents": contents,
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
        },
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn parse_response(body: &Value, model: &str) -> ChatResult {
    let content = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string();

    ChatResult {
        content,
        model_id: model.to_string(),
        usage: body.get("usageMetadata").and_then(parse_gemini_usage),
    }
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        prompt_tokens: u32::try_from(v.get("promptTokenCount")?.as_u64()?).ok()?,
        completion_tokens: u32::try_from(v.get("candidatesTokenCount")?.as_u64()?).ok()?,
        total_tokens: u32::try_from(v.get("totalTokenCount")?.as_u64()?).ok()?,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for GoogleProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatResult> {
        let url = self.generate_url(model);
        let body = build_body(messages);

        tracing::debug!(provider = "google", url = %redact_url_key(&url), "google chat request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            // The URL carries the key; keep it out of the error text.
            .map_err(|e| from_reqwest(e.without_url()))?;

        let resp_text = read_body(resp, ERROR_LABEL).await?;
        let resp_json: Value = serde_json::from_str(&resp_text)?;
        Ok(parse_response(&resp_json, model))
    }

    fn provider_id(&self) -> &str {
        ProviderKind::Google.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(body: &Value) -> Vec<(&str, &str)> {
        body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| {
                (
                    c["role"].as_str().unwrap(),
                    c["parts"][0]["text"].as_str().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn system_text_is_folded_into_first_turn() {
        let body = build_body(&[ChatMessage::system("S"), ChatMessage::user("U")]);
        assert_eq!(texts(&body), vec![("user", "S\n\nU")]);
    }

    #[test]
    fn system_after_turns_still_folds_into_first() {
        let body = build_body(&[
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::system("be brief"),
            ChatMessage::user("why?"),
        ]);
        assert_eq!(
            texts(&body),
            vec![
                ("user", "be brief\n\nhi"),
                ("model", "hello"),
                ("user", "why?"),
            ]
        );
    }

    #[test]
    fn only_first_system_message_is_folded() {
        let body = build_body(&[
            ChatMessage::system("one"),
            ChatMessage::system("two"),
            ChatMessage::user("U"),
        ]);
        assert_eq!(texts(&body), vec![("user", "one\n\nU")]);
    }

    #[test]
    fn lone_system_message_is_dropped() {
        let body = build_body(&[ChatMessage::system("S")]);
        assert!(body["contents"].as_array().unwrap().is_empty());
    }

    #[test]
    fn assistant_maps_to_model_role() {
        let body = build_body(&[ChatMessage::assistant("A"), ChatMessage::user("U")]);
        assert_eq!(
            texts(&body),
            vec![("model", "A"), ("user", "U")]
        );
    }

    #[test]
    fn generation_config_is_fixed() {
        let body = build_body(&[ChatMessage::user("U")]);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(body["generationConfig"]["temperature"].as_f64(), Some(0.7));
    }

    #[test]
    fn parse_extracts_first_candidate_text() {
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other"}]}}
            ]
        });
        let result = parse_response(&body, "gemini-1.5-flash");
        assert_eq!(result.content, "first");
        assert_eq!(result.model_id, "gemini-1.5-flash");
        assert!(result.usage.is_none());
    }

    #[test]
    fn parse_falls_back_when_path_missing() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({"candidates": []}),
            serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]}),
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
        ] {
            assert_eq!(parse_response(&body, "m").content, "No response");
        }
    }

    #[test]
    fn parse_passes_usage_through_verbatim() {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
            "usageMetadata": {
                "promptTokenCount": 4,
                "candidatesTokenCount": 6,
                "totalTokenCount": 42
            }
        });
        let usage = parse_response(&body, "m").usage.unwrap();
        assert_eq!(usage.prompt_tokens, 4);
        assert_eq!(usage.completion_tokens, 6);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn oversized_usage_counts_are_absent_not_truncated() {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
            "usageMetadata": {
                "promptTokenCount": 1,
                "candidatesTokenCount": 1,
                "totalTokenCount": 4294967297u64
            }
        });
        let result = parse_response(&body, "m");
        assert_eq!(result.content, "ok");
        assert!(result.usage.is_none());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let provider = GoogleProvider::new("https://g.test/v1beta", "AIza-secret").unwrap();
        let dbg = format!("{provider:?}");
        assert!(!dbg.contains("AIza-secret"));
        assert_eq!(
            provider.generate_url("gemini-1.5-flash"),
            "https://g.test/v1beta/models/gemini-1.5-flash:generateContent?key=AIza-secret"
        );
    }
}
