//! Chat orchestrator.
//!
//! Routes a conversation to the adapter that serves the requested model and
//! runs side-by-side comparisons of one prompt across several models.
//! Comparisons are strictly sequential with a fixed pause between calls so
//! free-tier rate limits are respected; one model failing never aborts the
//! rest.

use crate::gate::CredentialGate;
use chorus_domain::config::{Config, DEFAULT_COMPARE_DELAY_MS};
use chorus_domain::error::Result;
use chorus_domain::message::{ChatMessage, ChatResult};
use chorus_domain::model::{ModelDescriptor, ProviderKind};
use chorus_domain::trace::TraceEvent;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pause between consecutive calls of a comparison.
pub const DEFAULT_COMPARE_DELAY: Duration = Duration::from_millis(DEFAULT_COMPARE_DELAY_MS);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ChatOrchestrator {
    gate: Arc<CredentialGate>,
    compare_delay: Duration,
}

impl ChatOrchestrator {
    /// Build from an already-constructed gate (useful for testing).
    pub fn new(gate: Arc<CredentialGate>) -> Self {
        Self {
            gate,
            compare_delay: DEFAULT_COMPARE_DELAY,
        }
    }

    /// Construct the gate and orchestrator from the full config.
    pub fn from_config(config: &Config) -> Self {
        let gate = Arc::new(CredentialGate::from_config(&config.providers));
        Self::new(gate).with_compare_delay(Duration::from_millis(config.compare.delay_ms))
    }

    pub fn with_compare_delay(mut self, delay: Duration) -> Self {
        self.compare_delay = delay;
        self
    }

    pub fn gate(&self) -> &Arc<CredentialGate> {
        &self.gate
    }

    pub fn compare_delay(&self) -> Duration {
        self.compare_delay
    }

    // ── Credential pass-throughs ───────────────────────────────────

    pub fn list_available(&self) -> Vec<&'static ModelDescriptor> {
        self.gate.list_available()
    }

    pub fn has_credential(&self, model_id: &str) -> bool {
        self.gate.has_credential(model_id)
    }

    pub fn set_credential(&self, kind: ProviderKind, secret: &str) -> Result<()> {
        self.gate.set_credential(kind, secret)
    }

    // ── Public chat API ────────────────────────────────────────────

    /// Send `history` to the adapter registered for `model_id`.
    ///
    /// Fails with [`Error::NotConfigured`](chorus_domain::Error::NotConfigured)
    /// before any network activity when the model has no credential. Adapter
    /// errors propagate unchanged.
    pub async fn chat(&self, model_id: &str, history: &[ChatMessage]) -> Result<ChatResult> {
        let provider = self.gate.resolve(model_id)?;

        let start = Instant::now();
        let result = provider.chat(history, model_id).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let usage = result.as_ref().ok().and_then(|r| r.usage);
        TraceEvent::ChatCompleted {
            provider: provider.provider_id().to_string(),
            model: model_id.to_string(),
            ok: result.is_ok(),
            duration_ms,
            prompt_tokens: usage.map(|u| u.prompt_tokens),
            completion_tokens: usage.map(|u| u.completion_tokens),
        }
        .emit();

        if let Err(ref e) = result {
            tracing::warn!(
                provider = provider.provider_id(),
                model = model_id,
                error = %e,
                "chat request failed"
            );
        }
        result
    }

    /// Send `prompt` as a single user message to each model in order.
    ///
    /// Exactly one entry is produced per requested id, in request order,
    /// holding either the result or the error for that model. Calls never
    /// overlap, and the orchestrator pauses for the compare delay after
    /// every call that is followed by another, failed calls included.
    pub async fn compare_models<S: AsRef<str>>(
        &self,
        model_ids: &[S],
        prompt: &str,
    ) -> Comparison {
        let history = [ChatMessage::user(prompt)];
        let start = Instant::now();
        let mut entries = Vec::with_capacity(model_ids.len());

        for (i, id) in model_ids.iter().enumerate() {
            let model_id = id.as_ref();
            let outcome = self.chat(model_id, &history).await;
            entries.push(ComparisonEntry {
                model_id: model_id.to_string(),
                outcome,
            });

            if i + 1 < model_ids.len() && !self.compare_delay.is_zero() {
                tokio::time::sleep(self.compare_delay).await;
            }
        }

        let comparison = Comparison { entries };
        TraceEvent::ComparisonFinished {
            models: comparison.iter().map(|e| e.model_id.clone()).collect(),
            succeeded: comparison.succeeded(),
            failed: comparison.failed(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();
        comparison
    }
}

impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("gate", &self.gate)
            .field("compare_delay", &self.compare_delay)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Comparison results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of one model within a comparison.
#[derive(Debug)]
pub struct ComparisonEntry {
    pub model_id: String,
    pub outcome: Result<ChatResult>,
}

impl ComparisonEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-model outcomes of [`ChatOrchestrator::compare_models`], in request
/// order. Duplicate ids keep one entry each.
#[derive(Debug, Default)]
pub struct Comparison {
    entries: Vec<ComparisonEntry>,
}

impl Comparison {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome for `model_id`; the first one if the id was requested twice.
    pub fn get(&self, model_id: &str) -> Option<&Result<ChatResult>> {
        self.entries
            .iter()
            .find(|e| e.model_id == model_id)
            .map(|e| &e.outcome)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComparisonEntry> {
        self.entries.iter()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

impl IntoIterator for Comparison {
    type Item = ComparisonEntry;
    type IntoIter = std::vec::IntoIter<ComparisonEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Comparison {
    type Item = &'a ComparisonEntry;
    type IntoIter = std::slice::Iter<'a, ComparisonEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
