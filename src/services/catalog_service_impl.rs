//! `SeaORM` implementation of the `CatalogService` trait.

use crate::api::types::{
    CardDetailDto, CardDto, CardRequest, CatalogPageDto, CategoryDto, PageMetaDto,
};
use crate::db::Store;
use crate::domain::CardId;
use crate::domain::catalog::{CatalogParams, CatalogScope, QuerySpec};
use crate::entities::cards::CardStatus;
use crate::models::card::{Card, CardInput};
use crate::services::aggregates::{AggregateProvider, SiteContext};
use crate::services::auth_service::UserInfo;
use crate::services::catalog_service::{CatalogError, CatalogService};
use crate::services::pagination::{Page, PageWindow, paginate};
use crate::services::query::{QueryComposer, SearchMatcher};
use crate::services::view_counter::ViewCounter;
use async_trait::async_trait;
use tracing::{debug, info};

const MAX_TAG_LENGTH: usize = 50;

pub struct SeaOrmCatalogService {
    store: Store,
    aggregates: AggregateProvider,
    views: ViewCounter,
    page_size: u64,
    max_search_length: usize,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub fn new(
        store: Store,
        aggregates: AggregateProvider,
        page_size: u64,
        max_search_length: usize,
    ) -> Self {
        Self {
            views: ViewCounter::new(store.clone()),
            store,
            aggregates,
            page_size,
            max_search_length,
        }
    }

    async fn load_page(&self, spec: &QuerySpec) -> Result<Page<Card>, CatalogError> {
        let select = QueryComposer::compose(spec);

        let Some(matcher) = SearchMatcher::new(&spec.search) else {
            let total = self.store.count_matching_cards(select.clone()).await?;
            let window = PageWindow::new(total, self.page_size, spec.page);
            let cards = self
                .store
                .fetch_cards_window(select, window.offset(), window.page_size)
                .await?;
            return Ok(Page::from_window(cards, window));
        };

        let candidates = self.store.fetch_all_cards(select).await?;
        let scanned = candidates.len();
        let matched: Vec<Card> = candidates
            .into_iter()
            .filter(|card| matcher.matches(card))
            .collect();

        debug!(scanned, matched = matched.len(), "Applied catalog search");
        Ok(paginate(matched, self.page_size, spec.page))
    }

    async fn validated_input(&self, request: CardRequest) -> Result<CardInput, CatalogError> {
        let question = request.question.trim();
        let answer = request.answer.trim();

        if question.is_empty() {
            return Err(CatalogError::Validation("Question cannot be empty".to_string()));
        }
        if answer.is_empty() {
            return Err(CatalogError::Validation("Answer cannot be empty".to_string()));
        }
        if let Some(tag) = request
            .tags
            .iter()
            .find(|t| t.trim().chars().count() > MAX_TAG_LENGTH)
        {
            return Err(CatalogError::Validation(format!(
                "Tag '{}' is longer than {MAX_TAG_LENGTH} characters",
                tag.trim()
            )));
        }

        if self.store.get_category(request.category_id).await?.is_none() {
            return Err(CatalogError::Validation(format!(
                "Category {} does not exist",
                request.category_id
            )));
        }

        Ok(CardInput {
            question: question.to_string(),
            answer: answer.to_string(),
            category_id: request.category_id,
            tags: request.tags,
        })
    }

    async fn authorize_card_change(&self, actor: &UserInfo, id: CardId) -> Result<(), CatalogError> {
        let author_id = self
            .store
            .get_card_author(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if actor.can_modify(author_id) {
            Ok(())
        } else {
            Err(CatalogError::Forbidden(format!(
                "{} cannot modify card {id}",
                actor.username
            )))
        }
    }

    fn require_staff(actor: &UserInfo, action: &str) -> Result<(), CatalogError> {
        if actor.is_staff {
            Ok(())
        } else {
            Err(CatalogError::Forbidden(format!("Only staff can {action}")))
        }
    }
}

/// Lowercase ASCII letters, digits and hyphens.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_cards(
        &self,
        scope: CatalogScope,
        params: &CatalogParams,
    ) -> Result<CatalogPageDto, CatalogError> {
        let spec = QuerySpec::from_params(scope, params, self.max_search_length);
        let page = self.load_page(&spec).await?;
        let site = self.aggregates.site_context().await?;

        let meta = PageMetaDto::from(&page);
        Ok(CatalogPageDto {
            cards: page.items.into_iter().map(CardDto::from).collect(),
            page: meta,
            sort: spec.sort.as_str().to_string(),
            order: spec.direction.as_str().to_string(),
            search_query: spec.search,
            menu: site.menu,
            cards_count: site.cards_count,
            users_count: site.users_count,
        })
    }

    async fn get_card(&self, id: CardId) -> Result<CardDetailDto, CatalogError> {
        let card = self
            .store
            .get_card(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        // Counted after the read; the response keeps the value read above.
        self.views.spawn_increment(id);

        let site = self.aggregates.site_context().await?;
        Ok(CardDetailDto::new(CardDto::from(card), site))
    }

    async fn create_card(
        &self,
        actor: &UserInfo,
        request: CardRequest,
    ) -> Result<CardDto, CatalogError> {
        let input = self.validated_input(request).await?;
        let card = self.store.create_card(&input, actor.id.value()).await?;
        Ok(CardDto::from(card))
    }

    async fn update_card(
        &self,
        actor: &UserInfo,
        id: CardId,
        request: CardRequest,
    ) -> Result<CardDto, CatalogError> {
        self.authorize_card_change(actor, id).await?;
        let input = self.validated_input(request).await?;

        let card = self
            .store
            .update_card(id.value(), &input)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        Ok(CardDto::from(card))
    }

    async fn delete_card(&self, actor: &UserInfo, id: CardId) -> Result<(), CatalogError> {
        self.authorize_card_change(actor, id).await?;

        if !self.store.delete_card(id.value()).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!(card_id = %id, by = %actor.username, "Card deleted");
        Ok(())
    }

    async fn set_status(
        &self,
        actor: &UserInfo,
        ids: &[i32],
        status: CardStatus,
    ) -> Result<u64, CatalogError> {
        Self::require_staff(actor, "change card status")?;
        Ok(self.store.set_cards_status(ids, status).await?)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CatalogError> {
        let rows = self.store.list_categories().await?;
        Ok(rows.into_iter().map(CategoryDto::from).collect())
    }

    async fn create_category(
        &self,
        actor: &UserInfo,
        name: &str,
        slug: &str,
    ) -> Result<CategoryDto, CatalogError> {
        Self::require_staff(actor, "create categories")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }
        if !is_valid_slug(slug) {
            return Err(CatalogError::Validation(format!(
                "Invalid slug '{slug}': use lowercase letters, digits and hyphens"
            )));
        }
        if self.store.get_category_by_slug(slug).await?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "Category slug '{slug}' already exists"
            )));
        }

        let category = self.store.create_category(name, slug).await?;
        Ok(CategoryDto {
            id: category.id,
            name: category.name,
            slug: category.slug,
            cards_count: 0,
        })
    }

    async fn site_context(&self) -> Result<SiteContext, CatalogError> {
        Ok(self.aggregates.site_context().await?)
    }
}
