//! Shared handler state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::{AuthService, CatalogService, OrderService};

/// Everything a handler reaches for: config, the database pool and the
/// cached catalog. Clones share one allocation.
#[derive(Clone)]
pub struct AppState(Arc<Shared>);

struct Shared {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: CatalogService,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = CatalogService::new(config.catalog_path.clone());
        Self(Arc::new(Shared {
            config,
            pool,
            catalog,
        }))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.0.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.0.pool
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.0.catalog
    }

    /// Account login and signup against this state's pool.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.0.pool)
    }

    /// Order placement against this state's pool.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(&self.0.pool)
    }
}
