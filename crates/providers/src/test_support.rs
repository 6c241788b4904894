//! In-process fake adapters for unit tests.

use crate::gate::AdapterFactory;
use crate::traits::LlmProvider;
use chorus_domain::error::{Error, Result};
use chorus_domain::message::{ChatMessage, ChatResult};
use chorus_domain::ProviderKind;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared record of every call made through fake adapters.
#[derive(Default)]
pub(crate) struct CallLog {
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CallLog {
    pub(crate) fn models(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    pub(crate) fn messages(&self, idx: usize) -> Vec<ChatMessage> {
        self.calls.lock()[idx].1.clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct FakeProvider {
    kind: ProviderKind,
    secret: String,
    latency: Duration,
    failing_models: HashSet<String>,
    log: Arc<CallLog>,
}

#[async_trait::async_trait]
impl LlmProvider for FakeProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatResult> {
        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.log
            .calls
            .lock()
            .push((model.to_string(), messages.to_vec()));

        if self.failing_models.contains(model) {
            return Err(Error::Upstream {
                provider: self.kind.display_name().to_string(),
                status: 500,
                status_text: "Internal Server Error".into(),
                body: "boom".into(),
            });
        }

        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(ChatResult {
            content: format!("{model}[{}]: {last}", self.secret),
            model_id: model.to_string(),
            usage: None,
        })
    }

    fn provider_id(&self) -> &str {
        self.kind.id()
    }
}

/// Builds [`FakeProvider`]s and records which secrets it was handed.
#[derive(Clone, Default)]
pub(crate) struct FakeFactory {
    built: Arc<Mutex<Vec<(ProviderKind, String)>>>,
    log: Arc<CallLog>,
    fail_build: bool,
    latency: Duration,
    failing_models: HashSet<String>,
}

impl FakeFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every adapter build fails.
    pub(crate) fn failing(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Calls for `model` return a 500 upstream error.
    pub(crate) fn failing_model(mut self, model: &str) -> Self {
        self.failing_models.insert(model.to_string());
        self
    }

    pub(crate) fn built(&self) -> Vec<(ProviderKind, String)> {
        self.built.lock().clone()
    }

    pub(crate) fn log(&self) -> Arc<CallLog> {
        Arc::clone(&self.log)
    }

    pub(crate) fn factory(&self) -> AdapterFactory {
        let this = self.clone();
        Arc::new(move |kind: ProviderKind, secret: &str| {
            if this.fail_build {
                return Err(Error::Transport("client build failed".into()));
            }
            this.built.lock().push((kind, secret.to_string()));
            let adapter: Arc<dyn LlmProvider> = Arc::new(FakeProvider {
                kind,
                secret: secret.to_string(),
                latency: this.latency,
                failing_models: this.failing_models.clone(),
                log: Arc::clone(&this.log),
            });
            Ok(adapter)
        })
    }
}
