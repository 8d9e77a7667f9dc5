//! Domain service for browsing and editing cards.
//!
//! Listing goes through the query composer and pagination; detail reads
//! schedule a view increment after the card has been read.

use crate::api::types::{CardDetailDto, CardDto, CardRequest, CatalogPageDto, CategoryDto};
use crate::domain::CardId;
use crate::domain::catalog::{CatalogParams, CatalogScope};
use crate::entities::cards::CardStatus;
use crate::services::aggregates::{AggregateError, SiteContext};
use crate::services::auth_service::UserInfo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Card not found: {0}")]
    NotFound(CardId),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<AggregateError> for CatalogError {
    fn from(err: AggregateError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for the card catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists one page of cards within `scope`.
    ///
    /// Never fails because of its parameters: unknown values fall back to
    /// defaults and an unknown category or tag gives an empty page.
    async fn list_cards(
        &self,
        scope: CatalogScope,
        params: &CatalogParams,
    ) -> Result<CatalogPageDto, CatalogError>;

    /// Reads a card and schedules its view increment.
    ///
    /// The returned view count is the value read, before this view is counted.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the card does not exist.
    async fn get_card(&self, id: CardId) -> Result<CardDetailDto, CatalogError>;

    async fn create_card(
        &self,
        actor: &UserInfo,
        request: CardRequest,
    ) -> Result<CardDto, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] unless `actor` wrote the card or is staff.
    async fn update_card(
        &self,
        actor: &UserInfo,
        id: CardId,
        request: CardRequest,
    ) -> Result<CardDto, CatalogError>;

    async fn delete_card(&self, actor: &UserInfo, id: CardId) -> Result<(), CatalogError>;

    /// Staff only. Returns the number of cards changed.
    async fn set_status(
        &self,
        actor: &UserInfo,
        ids: &[i32],
        status: CardStatus,
    ) -> Result<u64, CatalogError>;

    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CatalogError>;

    /// Staff only.
    async fn create_category(
        &self,
        actor: &UserInfo,
        name: &str,
        slug: &str,
    ) -> Result<CategoryDto, CatalogError>;

    async fn site_context(&self) -> Result<SiteContext, CatalogError>;
}
