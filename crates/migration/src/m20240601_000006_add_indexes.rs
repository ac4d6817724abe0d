use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // StreamingAccount: owner scoping
        manager
            .create_index(
                Index::create()
                    .name("idx_streaming_account_owner")
                    .table(StreamingAccount::Table)
                    .col(StreamingAccount::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ScreenSubscription: availability scan per account
        manager
            .create_index(
                Index::create()
                    .name("idx_screen_subscription_account_available")
                    .table(ScreenSubscription::Table)
                    .col(ScreenSubscription::AccountId)
                    .col(ScreenSubscription::IsActive)
                    .col(ScreenSubscription::UserId)
                    .to_owned(),
            )
            .await?;

        // ScreenSubscription: my_screens lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_screen_subscription_user")
                    .table(ScreenSubscription::Table)
                    .col(ScreenSubscription::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_screen_subscription_user").table(ScreenSubscription::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_screen_subscription_account_available").table(ScreenSubscription::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_streaming_account_owner").table(StreamingAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StreamingAccount { Table, OwnerId }

#[derive(DeriveIden)]
enum ScreenSubscription { Table, AccountId, UserId, IsActive }
