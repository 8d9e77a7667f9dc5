//! Cached site-wide values: navigation menu, card count, user count.
//!
//! Every getter goes through the [`CacheAside`] store under a fixed key.
//! A zero count is an ordinary cached value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::cache::{CacheAside, CachedValue};
use crate::config::MenuItem;
use crate::constants::cache::{CARDS_COUNT_KEY, MENU_KEY, USERS_COUNT_KEY};
use crate::db::Store;

#[derive(Debug, Clone, Error)]
pub enum AggregateError {
    #[error("Failed to compute {key}: {message}")]
    Compute { key: &'static str, message: String },

    #[error("Cache entry {0} holds an unexpected value")]
    UnexpectedValue(&'static str),
}

/// Where the counts come from.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    async fn count_cards(&self) -> anyhow::Result<u64>;

    async fn count_users(&self) -> anyhow::Result<u64>;
}

#[async_trait]
impl AggregateSource for Store {
    async fn count_cards(&self) -> anyhow::Result<u64> {
        Self::count_cards(self).await
    }

    async fn count_users(&self) -> anyhow::Result<u64> {
        Self::count_users(self).await
    }
}

/// Shared values every page shows.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub menu: Vec<MenuItem>,
    pub cards_count: u64,
    pub users_count: u64,
}

#[derive(Clone)]
pub struct AggregateProvider {
    cache: CacheAside,
    source: Arc<dyn AggregateSource>,
    menu: Arc<Vec<MenuItem>>,
    ttl: Duration,
}

impl AggregateProvider {
    #[must_use]
    pub fn new(
        cache: CacheAside,
        source: Arc<dyn AggregateSource>,
        menu: Vec<MenuItem>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            source,
            menu: Arc::new(menu),
            ttl,
        }
    }

    pub async fn get_menu(&self) -> Result<Arc<Vec<MenuItem>>, AggregateError> {
        let menu = self.menu.clone();
        let value = self
            .cache
            .get_or_compute(MENU_KEY, self.ttl, || async move {
                Ok::<_, AggregateError>(CachedValue::Menu(menu))
            })
            .await?;

        match value {
            CachedValue::Menu(menu) => Ok(menu),
            CachedValue::Count(_) => Err(AggregateError::UnexpectedValue(MENU_KEY)),
        }
    }

    pub async fn get_cards_count(&self) -> Result<u64, AggregateError> {
        let source = self.source.clone();
        self.cached_count(CARDS_COUNT_KEY, || async move { source.count_cards().await })
            .await
    }

    pub async fn get_users_count(&self) -> Result<u64, AggregateError> {
        let source = self.source.clone();
        self.cached_count(USERS_COUNT_KEY, || async move { source.count_users().await })
            .await
    }

    /// Menu and both counts, for handlers that render site chrome.
    pub async fn site_context(&self) -> Result<SiteContext, AggregateError> {
        let (menu, cards_count, users_count) = tokio::try_join!(
            self.get_menu(),
            self.get_cards_count(),
            self.get_users_count()
        )?;

        Ok(SiteContext {
            menu: menu.as_ref().clone(),
            cards_count,
            users_count,
        })
    }

    async fn cached_count<F, Fut>(&self, key: &'static str, count: F) -> Result<u64, AggregateError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<u64>>,
    {
        let value = self
            .cache
            .get_or_compute(key, self.ttl, || async move {
                count()
                    .await
                    .map(CachedValue::Count)
                    .map_err(|e| AggregateError::Compute {
                        key,
                        message: format!("{e:#}"),
                    })
            })
            .await?;

        match value {
            CachedValue::Count(n) => Ok(n),
            CachedValue::Menu(_) => Err(AggregateError::UnexpectedValue(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSource {
        cards: AtomicU64,
        users: AtomicU64,
        card_calls: AtomicUsize,
        user_calls: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl AggregateSource for FakeSource {
        async fn count_cards(&self) -> anyhow::Result<u64> {
            self.card_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("database is locked");
            }
            Ok(self.cards.load(Ordering::SeqCst))
        }

        async fn count_users(&self) -> anyhow::Result<u64> {
            self.user_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.load(Ordering::SeqCst))
        }
    }

    fn provider(source: Arc<FakeSource>, cache: CacheAside, ttl: Duration) -> AggregateProvider {
        AggregateProvider::new(cache, source, SiteConfig::default().menu, ttl)
    }

    #[tokio::test]
    async fn test_zero_count_is_served_from_cache() {
        let source = Arc::new(FakeSource::default());
        let aggregates = provider(source.clone(), CacheAside::new(16), Duration::from_secs(30));

        assert_eq!(aggregates.get_cards_count().await.unwrap(), 0);
        assert_eq!(aggregates.get_cards_count().await.unwrap(), 0);
        assert_eq!(source.card_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeated_reads_within_ttl_are_identical() {
        let source = Arc::new(FakeSource::default());
        source.users.store(3, Ordering::SeqCst);
        let aggregates = provider(source.clone(), CacheAside::new(16), Duration::from_secs(30));

        let first = aggregates.get_users_count().await.unwrap();
        source.users.store(10, Ordering::SeqCst);
        let second = aggregates.get_users_count().await.unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 3);
        assert_eq!(source.user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_reflects_new_state() {
        let source = Arc::new(FakeSource::default());
        let aggregates = provider(source.clone(), CacheAside::new(16), Duration::from_millis(100));

        assert_eq!(aggregates.get_cards_count().await.unwrap(), 0);
        source.cards.store(35, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(aggregates.get_cards_count().await.unwrap(), 35);
        assert_eq!(source.card_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_passes_through() {
        let source = Arc::new(FakeSource::default());
        let aggregates = provider(source.clone(), CacheAside::disabled(), Duration::from_secs(30));

        aggregates.get_cards_count().await.unwrap();
        aggregates.get_cards_count().await.unwrap();
        assert_eq!(source.card_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_count_is_retried() {
        let source = Arc::new(FakeSource::default());
        let aggregates = provider(source.clone(), CacheAside::new(16), Duration::from_secs(30));

        source.fail.store(true, Ordering::SeqCst);
        let err = aggregates.get_cards_count().await.unwrap_err();
        assert!(matches!(err, AggregateError::Compute { key: "cards_count", .. }));

        source.fail.store(false, Ordering::SeqCst);
        source.cards.store(2, Ordering::SeqCst);
        assert_eq!(aggregates.get_cards_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_site_context() {
        let source = Arc::new(FakeSource::default());
        source.cards.store(4, Ordering::SeqCst);
        source.users.store(2, Ordering::SeqCst);
        let aggregates = provider(source, CacheAside::new(16), Duration::from_secs(30));

        let ctx = aggregates.site_context().await.unwrap();
        assert_eq!(ctx.cards_count, 4);
        assert_eq!(ctx.users_count, 2);
        assert_eq!(ctx.menu.len(), 3);
        assert_eq!(ctx.menu[0].title, "Home");

        let menu = aggregates.get_menu().await.unwrap();
        assert_eq!(menu.as_ref(), &ctx.menu);
    }
}
