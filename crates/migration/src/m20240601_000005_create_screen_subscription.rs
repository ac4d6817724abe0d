//! Create `screen_subscription` table.
//! One row per assignable screen; `user_id` NULL means unassigned.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScreenSubscription::Table)
                    .if_not_exists()
                    .col(uuid(ScreenSubscription::Id).primary_key())
                    .col(uuid(ScreenSubscription::AccountId).not_null())
                    .col(ColumnDef::new(ScreenSubscription::UserId).uuid().null())
                    .col(boolean(ScreenSubscription::IsActive).not_null().default(true))
                    .col(string_len(ScreenSubscription::PaymentStatus, 1).not_null().default("N"))
                    .col(timestamp_with_time_zone(ScreenSubscription::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_subscription_account")
                            .from(ScreenSubscription::Table, ScreenSubscription::AccountId)
                            .to(StreamingAccount::Table, StreamingAccount::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_subscription_user")
                            .from(ScreenSubscription::Table, ScreenSubscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ScreenSubscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ScreenSubscription { Table, Id, AccountId, UserId, IsActive, PaymentStatus, CreatedAt }

#[derive(DeriveIden)]
enum StreamingAccount { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
