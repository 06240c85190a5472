//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::BackendClient;
use crate::config::StorefrontConfig;
use crate::payments::{CheckoutOrchestrator, ProcessorClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend API client, the checkout orchestrator and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: BackendClient,
    checkout: CheckoutOrchestrator<BackendClient, ProcessorClient>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = BackendClient::new(&config.backend);
        let processor = ProcessorClient::new(&config.payments);
        let checkout = CheckoutOrchestrator::new(api.clone(), processor);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &BackendClient {
        &self.inner.api
    }

    /// Get a reference to the checkout orchestrator.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutOrchestrator<BackendClient, ProcessorClient> {
        &self.inner.checkout
    }
}
