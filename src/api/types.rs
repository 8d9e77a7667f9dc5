use serde::{Deserialize, Serialize};

use crate::config::MenuItem;
use crate::db::CategoryWithCount;
use crate::entities::cards::CardStatus;
use crate::models::card::{Card, CategoryRef, TagRef};
use crate::services::aggregates::SiteContext;
use crate::services::pagination::Page;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: Option<CategoryRef>,
    pub tags: Vec<TagRef>,
    pub status: CardStatus,
    pub views: i64,
    pub upload_date: String,
    pub author_id: i32,
    pub author: Option<String>,
    pub has_code: bool,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        let has_code = card.has_code();
        Self {
            id: card.id,
            question: card.question,
            answer: card.answer,
            category: card.category,
            tags: card.tags,
            status: card.status,
            views: card.views,
            upload_date: card.upload_date,
            author_id: card.author_id,
            author: card.author,
            has_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageMetaDto {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<&Page<T>> for PageMetaDto {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            total_pages: page.total_pages,
            total_items: page.total_items,
            has_next: page.has_next,
            has_previous: page.has_previous,
        }
    }
}

/// One listing page plus the effective parameters and site context.
#[derive(Debug, Serialize)]
pub struct CatalogPageDto {
    pub cards: Vec<CardDto>,
    pub page: PageMetaDto,
    pub sort: String,
    pub order: String,
    pub search_query: String,
    pub menu: Vec<MenuItem>,
    pub cards_count: u64,
    pub users_count: u64,
}

#[derive(Debug, Serialize)]
pub struct CardDetailDto {
    pub card: CardDto,
    pub menu: Vec<MenuItem>,
    pub cards_count: u64,
    pub users_count: u64,
}

impl CardDetailDto {
    #[must_use]
    pub fn new(card: CardDto, site: SiteContext) -> Self {
        Self {
            card,
            menu: site.menu,
            cards_count: site.cards_count,
            users_count: site.users_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub cards_count: i64,
}

impl From<CategoryWithCount> for CategoryDto {
    fn from(row: CategoryWithCount) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            cards_count: row.cards_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardRequest {
    pub question: String,
    pub answer: String,
    pub category_id: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<i32>,
    pub status: CardStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}
