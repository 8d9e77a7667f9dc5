use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::CacheAside;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AggregateProvider, AuthService, CatalogService, SeaOrmAuthService, SeaOrmCatalogService,
};

/// Long-lived services shared by the HTTP layer and the CLI.
///
/// The aggregate cache lives exactly as long as this value.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub cache: CacheAside,

    pub aggregates: AggregateProvider,

    pub catalog_service: Arc<dyn CatalogService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let cache = CacheAside::from_config(&config.cache);

        let aggregates = AggregateProvider::new(
            cache.clone(),
            Arc::new(store.clone()),
            config.site.menu.clone(),
            config.cache_ttl(),
        );

        let catalog_service = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            aggregates.clone(),
            config.catalog.page_size,
            config.catalog.max_search_length,
        )) as Arc<dyn CatalogService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            cache,
            aggregates,
            catalog_service,
            auth_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
