use crate::screen_subscription::{self, NewScreen, PaymentStatus};
use crate::streaming_account::{self, NewAccount};
use crate::{streaming_service, user, user_credentials};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

fn new_user(tag: &str) -> user::NewUser {
    user::NewUser {
        email: format!("{tag}_{}@example.com", Uuid::new_v4()),
        username: tag.to_string(),
        ..Default::default()
    }
}

/// Test user + credentials CRUD
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let created = user::create(&db, &new_user("crud_user")).await?;
    assert!(!created.is_admin);

    let found = user::Entity::find()
        .filter(user::Column::Email.eq(created.email.clone()))
        .one(&db)
        .await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let creds = user_credentials::upsert_password(&db, created.id, "hash-one".into(), "argon2").await?;
    let again = user_credentials::upsert_password(&db, created.id, "hash-two".into(), "argon2").await?;
    assert_eq!(creds.id, again.id);
    assert_eq!(again.password_hash, "hash-two");

    user::hard_delete(&db, created.id).await?;
    assert!(user_credentials::find_by_user(&db, created.id).await?.is_none());
    Ok(())
}

/// Test account/screen creation, payment status persistence and cascade delete
#[tokio::test]
async fn test_account_screen_cascade() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let owner = user::create(&db, &new_user("crud_owner")).await?;
    let service = streaming_service::create(&db, &format!("svc_{}", Uuid::new_v4())).await?;
    let account = streaming_account::create(
        &db,
        owner.id,
        &NewAccount {
            service_id: service.id,
            username: "shared@example.com".into(),
            password: "password123".into(),
            price_per_screen: 999,
            total_screens: 4,
        },
    )
    .await?;

    let screen = screen_subscription::create(
        &db,
        &NewScreen { payment_status: Some(PaymentStatus::Pending), ..NewScreen::for_account(account.id) },
    )
    .await?;
    assert!(screen.is_available());
    assert_eq!(screen.payment_status, PaymentStatus::Pending);

    let mut am: screen_subscription::ActiveModel = screen.clone().into();
    am.payment_status = Set(PaymentStatus::Completed);
    am.update(&db).await?;
    let reloaded = screen_subscription::Entity::find_by_id(screen.id).one(&db).await?.unwrap();
    assert_eq!(reloaded.payment_status, PaymentStatus::Completed);

    let related = account.find_related(screen_subscription::Entity).all(&db).await?;
    assert_eq!(related.len(), 1);

    streaming_account::Entity::delete_by_id(account.id).exec(&db).await?;
    assert!(screen_subscription::Entity::find_by_id(screen.id).one(&db).await?.is_none());

    streaming_service::Entity::delete_by_id(service.id).exec(&db).await?;
    user::hard_delete(&db, owner.id).await?;
    Ok(())
}

/// Deleting a subscriber leaves the screen behind, unassigned
#[tokio::test]
async fn test_user_delete_releases_screen() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let owner = user::create(&db, &new_user("release_owner")).await?;
    let subscriber = user::create(&db, &new_user("release_sub")).await?;
    let service = streaming_service::create(&db, "Release Service").await?;
    let account = streaming_account::create(
        &db,
        owner.id,
        &NewAccount {
            service_id: service.id,
            username: "acct".into(),
            password: "pw".into(),
            price_per_screen: 0,
            total_screens: 1,
        },
    )
    .await?;
    let screen = screen_subscription::create(
        &db,
        &NewScreen { user_id: Some(subscriber.id), ..NewScreen::for_account(account.id) },
    )
    .await?;
    assert!(!screen.is_available());

    user::hard_delete(&db, subscriber.id).await?;
    let reloaded = screen_subscription::Entity::find_by_id(screen.id).one(&db).await?.unwrap();
    assert!(reloaded.user_id.is_none());
    assert!(reloaded.is_available());

    streaming_service::Entity::delete_by_id(service.id).exec(&db).await?;
    user::hard_delete(&db, owner.id).await?;
    Ok(())
}
