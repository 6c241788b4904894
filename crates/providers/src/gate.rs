//! Credential gate.
//!
//! Maps model ids to the adapter that serves them. A model id is present in
//! the map exactly when its provider has a usable credential: non-empty and
//! not the provider's documentation placeholder.
//!
//! Lifecycle: built once at startup from [`ProvidersConfig`] (reading one
//! credential per provider), then mutated only through
//! [`CredentialGate::set_credential`], which lets callers rotate keys without
//! a restart. Secrets live only inside adapter instances and are never
//! logged.

use crate::google::GoogleProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::traits::LlmProvider;
use crate::util::resolve_api_key;
use chorus_domain::config::ProvidersConfig;
use chorus_domain::error::{Error, Result};
use chorus_domain::model::{self, ModelDescriptor, ProviderKind};
use chorus_domain::trace::TraceEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an adapter for a provider, bound to one secret.
pub type AdapterFactory =
    Arc<dyn Fn(ProviderKind, &str) -> Result<Arc<dyn LlmProvider>> + Send + Sync>;

/// The factory used in production: real HTTP adapters configured from
/// `config` (base URLs, attribution headers).
pub fn http_factory(config: ProvidersConfig) -> AdapterFactory {
    Arc::new(move |kind: ProviderKind, secret: &str| {
        let cfg = config.get(kind);
        let adapter: Arc<dyn LlmProvider> = match kind {
            ProviderKind::Google => Arc::new(GoogleProvider::from_config(cfg, secret)?),
            ProviderKind::OpenRouter => {
                Arc::new(OpenAiCompatProvider::from_config(kind, cfg, secret)?)
            }
        };
        Ok(adapter)
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CredentialGate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds the adapter instance for every model whose provider is configured.
pub struct CredentialGate {
    adapters: RwLock<HashMap<String, Arc<dyn LlmProvider>>>,
    factory: AdapterFactory,
}

impl CredentialGate {
    /// An empty gate that builds adapters with `factory`.
    pub fn with_factory(factory: AdapterFactory) -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
            factory,
        }
    }

    /// Build the gate from the providers config.
    ///
    /// One credential is resolved per provider (inline key, then env var).
    /// Empty and placeholder values count as absent. Providers whose adapter
    /// fails to build are logged and skipped rather than aborting startup.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let gate = Self::with_factory(http_factory(config.clone()));
        gate.load_credentials(config);
        gate
    }

    /// Read one credential per provider from `config` and register it.
    ///
    /// Safe to call again on reload: a provider whose credential is now
    /// missing, empty, the placeholder, or unbuildable loses its adapters.
    pub fn load_credentials(&self, config: &ProvidersConfig) {
        for kind in ProviderKind::ALL {
            let secret = resolve_api_key(&config.get(kind).auth, kind).unwrap_or_default();
            if !kind.accepts_key(&secret) {
                if !secret.is_empty() {
                    tracing::info!(
                        provider = kind.id(),
                        "credential is the placeholder value, treating as not configured"
                    );
                }
                self.clear_if_registered(kind);
                continue;
            }
            if let Err(e) = self.set_credential(kind, &secret) {
                tracing::warn!(
                    provider = kind.id(),
                    error = %e,
                    "failed to initialize chat adapter, skipping"
                );
                self.clear_if_registered(kind);
            }
        }

        if self.is_empty() {
            tracing::warn!(
                "no provider credentials configured; set GOOGLE_API_KEY or \
                 OPENROUTER_API_KEY (or [providers.*.auth] in the config file)"
            );
        }
    }

    /// Bind `secret` to `kind`, (re)registering a fresh adapter for every
    /// catalog model of that provider. Previous adapters for those ids are
    /// replaced.
    ///
    /// An empty or placeholder secret unregisters the provider's models.
    pub fn set_credential(&self, kind: ProviderKind, secret: &str) -> Result<()> {
        let models: Vec<String> = model::models_for(kind).map(|m| m.id.to_string()).collect();

        if !kind.accepts_key(secret) {
            {
                let mut adapters = self.adapters.write();
                for id in &models {
                    adapters.remove(id);
                }
            }
            tracing::info!(provider = kind.id(), "credential cleared");
            TraceEvent::CredentialSet {
                provider: kind.id().to_string(),
                models,
                configured: false,
            }
            .emit();
            return Ok(());
        }

        let adapter = (self.factory)(kind, secret)?;
        {
            let mut adapters = self.adapters.write();
            for id in &models {
                adapters.insert(id.clone(), Arc::clone(&adapter));
            }
        }

        tracing::info!(provider = kind.id(), models = ?models, "registered chat adapter");
        TraceEvent::CredentialSet {
            provider: kind.id().to_string(),
            models,
            configured: true,
        }
        .emit();
        Ok(())
    }

    /// Drop `kind`'s adapters if any are registered.
    fn clear_if_registered(&self, kind: ProviderKind) {
        if model::models_for(kind).any(|m| self.has_credential(m.id)) {
            // An empty secret only unregisters; it cannot fail.
            let _ = self.set_credential(kind, "");
        }
    }

    /// Like [`set_credential`](Self::set_credential), with the provider given
    /// by name (`"Google"`, `"openrouter"`, ...).
    pub fn set_credential_by_name(&self, provider: &str, secret: &str) -> Result<()> {
        let kind: ProviderKind = provider.parse()?;
        self.set_credential(kind, secret)
    }

    /// Whether an adapter is registered for `model_id`.
    pub fn has_credential(&self, model_id: &str) -> bool {
        self.adapters.read().contains_key(model_id)
    }

    /// The adapter serving `model_id`.
    pub fn resolve(&self, model_id: &str) -> Result<Arc<dyn LlmProvider>> {
        self.adapters
            .read()
            .get(model_id)
            .cloned()
            .ok_or_else(|| Error::NotConfigured {
                model_id: model_id.to_string(),
            })
    }

    /// Catalog entries with a registered adapter, in catalog order.
    pub fn list_available(&self) -> Vec<&'static ModelDescriptor> {
        let adapters = self.adapters.read();
        model::catalog()
            .iter()
            .filter(|m| adapters.contains_key(m.id))
            .collect()
    }

    /// The preferred available model: the first catalog entry with a
    /// credential.
    pub fn best_available(&self) -> Option<&'static ModelDescriptor> {
        let adapters = self.adapters.read();
        model::catalog().iter().find(|m| adapters.contains_key(m.id))
    }

    /// Number of model ids with a registered adapter.
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<String> = self.adapters.read().keys().cloned().collect();
        ids.sort();
        f.debug_struct("CredentialGate")
            .field("configured_models", &ids)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
