//! Application state shared across handlers.

use std::sync::Arc;

use url::Url;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::auth::AdminDirectory;
use crate::services::orders::OrderService;
use crate::services::player::{CachedResolver, HttpResolver, MockResolver, PlayerResolver};
use crate::store::OrderStore;

/// Error assembling application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("failed to build player resolver: {0}")]
    Resolver(String),
    #[error("invalid admin email: {0}")]
    AdminEmail(#[from] ucdrop_core::EmailError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, order store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    orders: OrderStore,
    order_service: OrderService,
    resolver: Arc<dyn PlayerResolver>,
    directory: AdminDirectory,
}

impl AppState {
    /// Create application state, building the player resolver from
    /// configuration.
    ///
    /// With `PLAYER_PROVIDER_URL` set the resolver goes over HTTP; without
    /// it the deterministic mock is used. Either way lookups sit behind a
    /// TTL cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or provider URL cannot be parsed.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let resolver: Arc<dyn PlayerResolver> = match &config.player.provider_url {
            Some(provider) => {
                let base = Url::parse(provider)?;
                let http = HttpResolver::new(base, config.player.request_timeout)
                    .map_err(|e| StateError::Resolver(e.to_string()))?;
                Arc::new(CachedResolver::new(http, config.player.cache_ttl))
            }
            None => Arc::new(CachedResolver::new(
                MockResolver::new(),
                config.player.cache_ttl,
            )),
        };
        Self::with_resolver(config, catalog, resolver)
    }

    /// Create application state with an explicit resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn with_resolver(
        config: StorefrontConfig,
        catalog: Catalog,
        resolver: Arc<dyn PlayerResolver>,
    ) -> Result<Self, StateError> {
        let base_url = Url::parse(&config.base_url)?;
        let catalog = Arc::new(catalog);
        let orders = OrderStore::new();
        let order_service = OrderService::new(Arc::clone(&catalog), orders.clone(), base_url);
        let directory = AdminDirectory::from_config(&config.admin)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                order_service,
                resolver,
                directory,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn order_service(&self) -> &OrderService {
        &self.inner.order_service
    }

    /// Get a reference to the player resolver.
    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn PlayerResolver> {
        &self.inner.resolver
    }

    /// Get a reference to the admin directory.
    #[must_use]
    pub fn directory(&self) -> &AdminDirectory {
        &self.inner.directory
    }
}
