use crate::constants::limits::ID_BATCH_SIZE;
use crate::db::repositories::tags::ensure_tags;
use crate::db::timestamp;
use crate::entities::{card_tags, cards, cards::CardStatus, categories, prelude::*, users};
use crate::models::card::{Card, CardInput, CategoryRef, TagRef};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Select, Set, TransactionTrait, sea_query::Expr,
};
use std::collections::HashMap;
use tracing::{debug, info};

type CardRow = (cards::Model, Option<categories::Model>);

pub struct CardRepository {
    conn: DatabaseConnection,
}

impl CardRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn count(&self, select: Select<cards::Entity>) -> Result<u64> {
        select
            .count(&self.conn)
            .await
            .context("Failed to count cards")
    }

    /// One page of a composed query, with categories joined in the same query.
    pub async fn fetch_window(
        &self,
        select: Select<cards::Entity>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Card>> {
        let rows = select
            .find_also_related(Categories)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to fetch card page")?;

        self.hydrate(rows).await
    }

    pub async fn fetch_all(&self, select: Select<cards::Entity>) -> Result<Vec<Card>> {
        let rows = select
            .find_also_related(Categories)
            .all(&self.conn)
            .await
            .context("Failed to fetch cards")?;

        self.hydrate(rows).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Card>> {
        let row = Cards::find_by_id(id)
            .find_also_related(Categories)
            .one(&self.conn)
            .await
            .context("Failed to fetch card")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    pub async fn author_of(&self, id: i32) -> Result<Option<i32>> {
        let card = Cards::find_by_id(id).one(&self.conn).await?;
        Ok(card.map(|c| c.author_id))
    }

    pub async fn count_all(&self) -> Result<u64> {
        Ok(Cards::find().count(&self.conn).await?)
    }

    /// Attaches tags and author names with one batched query per relation.
    async fn hydrate(&self, rows: Vec<CardRow>) -> Result<Vec<Card>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i32> = rows.iter().map(|(c, _)| c.id).collect();
        let mut author_ids: Vec<i32> = rows.iter().map(|(c, _)| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags_by_card = self.load_tags(&ids).await?;
        let authors = self.load_authors(&author_ids).await?;

        debug!(cards = rows.len(), "Hydrated card rows");

        Ok(rows
            .into_iter()
            .map(|(card, category)| {
                let mut tags = tags_by_card.remove(&card.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name));

                Card {
                    id: card.id,
                    question: card.question,
                    answer: card.answer,
                    category: category.map(|c| CategoryRef {
                        id: c.id,
                        name: c.name,
                        slug: c.slug,
                    }),
                    tags,
                    status: card.status,
                    views: card.views,
                    upload_date: card.upload_date,
                    author_id: card.author_id,
                    author: authors.get(&card.author_id).cloned(),
                }
            })
            .collect())
    }

    async fn load_tags(&self, card_ids: &[i32]) -> Result<HashMap<i32, Vec<TagRef>>> {
        let mut map: HashMap<i32, Vec<TagRef>> = HashMap::new();

        for chunk in card_ids.chunks(ID_BATCH_SIZE) {
            let links = CardTags::find()
                .filter(card_tags::Column::CardId.is_in(chunk.iter().copied()))
                .find_also_related(Tags)
                .all(&self.conn)
                .await
                .context("Failed to load card tags")?;

            for (link, tag) in links {
                if let Some(tag) = tag {
                    map.entry(link.card_id).or_default().push(TagRef {
                        id: tag.id,
                        name: tag.name,
                    });
                }
            }
        }

        Ok(map)
    }

    async fn load_authors(&self, user_ids: &[i32]) -> Result<HashMap<i32, String>> {
        let mut map = HashMap::new();

        for chunk in user_ids.chunks(ID_BATCH_SIZE) {
            let rows = Users::find()
                .filter(users::Column::Id.is_in(chunk.iter().copied()))
                .all(&self.conn)
                .await
                .context("Failed to load card authors")?;

            map.extend(rows.into_iter().map(|u| (u.id, u.username)));
        }

        Ok(map)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Adds one to the view counter in a single `UPDATE ... SET views = views + 1`.
    ///
    /// Returns false when the card does not exist.
    pub async fn increment_views(&self, id: i32) -> Result<bool> {
        let result = Cards::update_many()
            .col_expr(cards::Column::Views, Expr::col(cards::Column::Views).add(1))
            .filter(cards::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment card views")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create(&self, input: &CardInput, author_id: i32) -> Result<Card> {
        let txn = self.conn.begin().await?;

        let card = cards::ActiveModel {
            question: Set(input.question.clone()),
            answer: Set(input.answer.clone()),
            category_id: Set(input.category_id),
            status: Set(CardStatus::Unchecked),
            views: Set(0),
            upload_date: Set(timestamp(chrono::Utc::now())),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert card")?;

        let tag_ids = ensure_tags(&txn, &input.tag_names()).await?;
        link_tags(&txn, card.id, &tag_ids).await?;

        txn.commit().await?;

        info!(card_id = card.id, author_id, "Created card");

        self.get(card.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Card {} vanished after insert", card.id))
    }

    /// Replaces the writable fields and the tag set. Views, status, author
    /// and upload date are left untouched.
    pub async fn update(&self, id: i32, input: &CardInput) -> Result<Option<Card>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Cards::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: cards::ActiveModel = existing.into();
        active.question = Set(input.question.clone());
        active.answer = Set(input.answer.clone());
        active.category_id = Set(input.category_id);
        active.update(&txn).await.context("Failed to update card")?;

        CardTags::delete_many()
            .filter(card_tags::Column::CardId.eq(id))
            .exec(&txn)
            .await?;

        let tag_ids = ensure_tags(&txn, &input.tag_names()).await?;
        link_tags(&txn, id, &tag_ids).await?;

        txn.commit().await?;

        info!(card_id = id, "Updated card");
        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        CardTags::delete_many()
            .filter(card_tags::Column::CardId.eq(id))
            .exec(&txn)
            .await?;

        let result = Cards::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected > 0 {
            info!(card_id = id, "Deleted card");
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn set_status(&self, ids: &[i32], status: CardStatus) -> Result<u64> {
        let mut updated = 0;

        for chunk in ids.chunks(ID_BATCH_SIZE) {
            let result = Cards::update_many()
                .col_expr(cards::Column::Status, Expr::value(status))
                .filter(cards::Column::Id.is_in(chunk.iter().copied()))
                .exec(&self.conn)
                .await
                .context("Failed to update card status")?;
            updated += result.rows_affected;
        }

        info!(count = updated, status = status.as_str(), "Updated card status");
        Ok(updated)
    }
}

async fn link_tags<C>(conn: &C, card_id: i32, tag_ids: &[i32]) -> Result<()>
where
    C: sea_orm::ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    let links = tag_ids.iter().map(|tag_id| card_tags::ActiveModel {
        card_id: Set(card_id),
        tag_id: Set(*tag_id),
    });

    CardTags::insert_many(links)
        .exec_without_returning(conn)
        .await
        .context("Failed to link card tags")?;

    Ok(())
}
