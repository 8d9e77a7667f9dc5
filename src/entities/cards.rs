use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation state of a card. Stored as an integer column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    #[sea_orm(num_value = 0)]
    Unchecked,
    #[sea_orm(num_value = 1)]
    Checked,
}

impl CardStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unchecked" => Some(Self::Unchecked),
            "checked" => Some(Self::Checked),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Checked => "checked",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub question: String,
    /// May embed fenced code blocks (```).
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub category_id: i32,
    pub status: CardStatus,
    pub views: i64,
    /// Fixed-width UTC RFC 3339, see `crate::db::timestamp`.
    pub upload_date: String,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::card_tags::Entity")]
    CardTags,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::card_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardTags.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_tags::Relation::Tags.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::card_tags::Relation::Cards.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
