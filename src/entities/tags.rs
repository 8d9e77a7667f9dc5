use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card_tags::Entity")]
    CardTags,
}

impl Related<super::card_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardTags.def()
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_tags::Relation::Cards.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::card_tags::Relation::Tags.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
