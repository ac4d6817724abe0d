//! Create `streaming_account` table.
//! Stores shared credentials and their fixed screen capacity.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StreamingAccount::Table)
                    .if_not_exists()
                    .col(uuid(StreamingAccount::Id).primary_key())
                    .col(uuid(StreamingAccount::OwnerId).not_null())
                    .col(uuid(StreamingAccount::ServiceId).not_null())
                    .col(string_len(StreamingAccount::Username, 255).not_null())
                    .col(string_len(StreamingAccount::Password, 255).not_null())
                    .col(integer(StreamingAccount::PricePerScreen).not_null())
                    .col(integer(StreamingAccount::TotalScreens).not_null())
                    .col(boolean(StreamingAccount::Verified).not_null().default(false))
                    .col(timestamp_with_time_zone(StreamingAccount::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(StreamingAccount::UpdatedAt).not_null())
                    .check(Expr::col(StreamingAccount::TotalScreens).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_streaming_account_owner")
                            .from(StreamingAccount::Table, StreamingAccount::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_streaming_account_service")
                            .from(StreamingAccount::Table, StreamingAccount::ServiceId)
                            .to(StreamingService::Table, StreamingService::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StreamingAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StreamingAccount {
    Table,
    Id,
    OwnerId,
    ServiceId,
    Username,
    Password,
    PricePerScreen,
    TotalScreens,
    Verified,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum StreamingService { Table, Id }
