use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Select, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{cards, categories::Model as CategoryRow};
use crate::models::card::{Card, CardInput};

pub mod migrator;
pub mod repositories;

pub use repositories::categories::CategoryWithCount;
pub use repositories::users::User;

/// Formats a timestamp the way every timestamp column stores it.
///
/// Fixed width (microseconds, `Z` suffix) so string order matches time order.
#[must_use]
pub fn timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        // Shared-cache memory databases report table locks instead of waiting.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        if !in_memory {
            let backend = conn.get_database_backend();
            for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA busy_timeout=5000"] {
                conn.execute(Statement::from_string(backend, pragma.to_string()))
                    .await?;
            }
        }

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn card_repo(&self) -> repositories::cards::CardRepository {
        repositories::cards::CardRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::categories::CategoryRepository {
        repositories::categories::CategoryRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tags::TagRepository {
        repositories::tags::TagRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::users::UserRepository {
        repositories::users::UserRepository::new(self.conn.clone())
    }

    // Cards

    pub async fn count_matching_cards(&self, select: Select<cards::Entity>) -> Result<u64> {
        self.card_repo().count(select).await
    }

    pub async fn fetch_cards_window(
        &self,
        select: Select<cards::Entity>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Card>> {
        self.card_repo().fetch_window(select, offset, limit).await
    }

    pub async fn fetch_all_cards(&self, select: Select<cards::Entity>) -> Result<Vec<Card>> {
        self.card_repo().fetch_all(select).await
    }

    pub async fn get_card(&self, id: i32) -> Result<Option<Card>> {
        self.card_repo().get(id).await
    }

    pub async fn get_card_author(&self, id: i32) -> Result<Option<i32>> {
        self.card_repo().author_of(id).await
    }

    pub async fn increment_card_views(&self, id: i32) -> Result<bool> {
        self.card_repo().increment_views(id).await
    }

    pub async fn create_card(&self, input: &CardInput, author_id: i32) -> Result<Card> {
        self.card_repo().create(input, author_id).await
    }

    pub async fn update_card(&self, id: i32, input: &CardInput) -> Result<Option<Card>> {
        self.card_repo().update(id, input).await
    }

    pub async fn delete_card(&self, id: i32) -> Result<bool> {
        self.card_repo().delete(id).await
    }

    pub async fn set_cards_status(&self, ids: &[i32], status: cards::CardStatus) -> Result<u64> {
        self.card_repo().set_status(ids, status).await
    }

    pub async fn count_cards(&self) -> Result<u64> {
        self.card_repo().count_all().await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>> {
        self.category_repo().list_with_counts().await
    }

    pub async fn get_category(&self, id: i32) -> Result<Option<CategoryRow>> {
        self.category_repo().get(id).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<CategoryRow>> {
        self.category_repo().get_by_slug(slug).await
    }

    pub async fn create_category(&self, name: &str, slug: &str) -> Result<CategoryRow> {
        self.category_repo().create(name, slug).await
    }

    pub async fn count_categories(&self) -> Result<u64> {
        self.category_repo().count().await
    }

    // Tags

    pub async fn count_tags(&self) -> Result<u64> {
        self.tag_repo().count().await
    }

    // Users

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_staff: bool,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, is_staff, security)
            .await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::microseconds(7);

        assert_eq!(timestamp(a), "2024-01-02T03:04:05.000000Z");
        assert_eq!(timestamp(b), "2024-01-02T03:04:05.000007Z");
        assert!(timestamp(a) < timestamp(b));
    }

    #[tokio::test]
    async fn test_memory_store_seeds_admin() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.count_cards().await.unwrap(), 0);

        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_staff);
    }
}
