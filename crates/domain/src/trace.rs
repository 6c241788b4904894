use serde::Serialize;

/// Structured trace events emitted across all chorus crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ChatCompleted {
        provider: String,
        model: String,
        ok: bool,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    ComparisonFinished {
        models: Vec<String>,
        succeeded: usize,
        failed: usize,
        duration_ms: u64,
    },
    CredentialSet {
        provider: String,
        models: Vec<String>,
        configured: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "chorus_event");
    }
}
