use crate::entities::{card_tags, cards, prelude::*};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Default catalog ordering.
        manager
            .create_index(
                Index::create()
                    .name("idx_cards_upload_date")
                    .table(Cards)
                    .col(cards::Column::UploadDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_category_id")
                    .table(Cards)
                    .col(cards::Column::CategoryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_author_id")
                    .table(Cards)
                    .col(cards::Column::AuthorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Tag scoping looks links up by tag first.
        manager
            .create_index(
                Index::create()
                    .name("idx_card_tags_tag_id")
                    .table(CardTags)
                    .col(card_tags::Column::TagId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_card_tags_tag_id")
                    .table(CardTags)
                    .to_owned(),
            )
            .await?;

        for name in [
            "idx_cards_author_id",
            "idx_cards_category_id",
            "idx_cards_upload_date",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Cards).to_owned())
                .await?;
        }

        Ok(())
    }
}
