use chorus_domain::error::Result;
use chorus_domain::message::{ChatMessage, ChatResult};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Output length cap sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.7;

/// Content substituted when a 2xx body lacks the expected text path.
pub const NO_RESPONSE: &str = "No response";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait that every chat adapter must implement.
///
/// Implementations translate the provider-agnostic history into one
/// provider's wire format, issue exactly one HTTP request, and normalize the
/// reply. They never retry.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the full conversation history for `model` and wait for the reply.
    ///
    /// Fails with [`Error::Upstream`](chorus_domain::Error::Upstream) on a
    /// non-2xx status and with a transport error when no response arrives.
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatResult>;

    /// A unique identifier for this provider (e.g. `google`).
    fn provider_id(&self) -> &str;
}
