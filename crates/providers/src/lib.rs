pub mod gate;
pub mod google;
pub mod openai_compat;
pub mod orchestrator;
pub mod traits;
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience.
pub use gate::{AdapterFactory, CredentialGate};
pub use orchestrator::{ChatOrchestrator, Comparison, ComparisonEntry};
pub use traits::LlmProvider;
