pub mod config;
pub mod error;
pub mod message;
pub mod model;
pub mod trace;

pub use error::{Error, Result};
pub use message::{ChatMessage, ChatResult, Role, Usage};
pub use model::{catalog, ModelDescriptor, ProviderKind};
