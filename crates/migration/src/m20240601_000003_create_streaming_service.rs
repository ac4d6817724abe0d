//! Create `streaming_service` table: the catalog of providers accounts belong to.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StreamingService::Table)
                    .if_not_exists()
                    .col(uuid(StreamingService::Id).primary_key())
                    .col(string_len(StreamingService::Name, 255).not_null())
                    .col(timestamp_with_time_zone(StreamingService::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StreamingService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StreamingService { Table, Id, Name, CreatedAt }
