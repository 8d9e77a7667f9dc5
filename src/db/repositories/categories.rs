use crate::entities::{cards, categories, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::JoinType,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct CategoryWithCount {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub cards_count: i64,
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        let rows = Categories::find()
            .select_only()
            .column(categories::Column::Id)
            .column(categories::Column::Name)
            .column(categories::Column::Slug)
            .column_as(cards::Column::Id.count(), "cards_count")
            .join(JoinType::LeftJoin, categories::Relation::Cards.def())
            .group_by(categories::Column::Id)
            .group_by(categories::Column::Name)
            .group_by(categories::Column::Slug)
            .order_by_asc(categories::Column::Name)
            .into_model::<CategoryWithCount>()
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<categories::Model>> {
        Ok(Categories::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<categories::Model>> {
        Ok(Categories::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?)
    }

    /// Inserts a category. Slug uniqueness is enforced by the unique index.
    pub async fn create(&self, name: &str, slug: &str) -> Result<categories::Model> {
        let model = categories::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            ..Default::default()
        };

        let inserted = Categories::insert(model)
            .exec_with_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to insert category '{slug}'"))?;

        info!("Created category {} ({})", inserted.name, inserted.slug);
        Ok(inserted)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Categories::find().count(&self.conn).await?)
    }
}
