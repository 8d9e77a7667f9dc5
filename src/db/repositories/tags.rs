use crate::entities::{prelude::*, tags};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, sea_query::OnConflict,
};

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Tags::find().count(&self.conn).await?)
    }
}

/// Resolves tag names to ids, creating the missing tags.
///
/// Runs on whatever connection it is given so card writes can call it
/// inside their transaction.
pub(crate) async fn ensure_tags<C>(conn: &C, names: &[String]) -> Result<Vec<i32>>
where
    C: ConnectionTrait,
{
    if names.is_empty() {
        return Ok(vec![]);
    }

    let models = names.iter().map(|name| tags::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    });

    Tags::insert_many(models)
        .on_conflict(
            OnConflict::column(tags::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let rows = Tags::find()
        .filter(tags::Column::Name.is_in(names.iter().cloned()))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|t| t.id).collect())
}
