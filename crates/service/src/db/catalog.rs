use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;
use models::streaming_service::{self, Entity as ServiceEntity};
use crate::errors::ServiceError;

/// List services ordered by name.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<streaming_service::Model>, ServiceError> {
    let rows = ServiceEntity::find()
        .order_by_asc(streaming_service::Column::Name)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<streaming_service::Model>, ServiceError> {
    Ok(ServiceEntity::find_by_id(id).one(db).await?)
}

/// Create a service after validation.
pub async fn create_service(db: &DatabaseConnection, name: &str) -> Result<streaming_service::Model, ServiceError> {
    Ok(streaming_service::create(db, name).await?)
}

pub async fn rename_service(db: &DatabaseConnection, id: Uuid, name: &str) -> Result<streaming_service::Model, ServiceError> {
    streaming_service::validate_name(name)?;
    let Some(existing) = ServiceEntity::find_by_id(id).one(db).await? else {
        return Err(ServiceError::not_found("service"));
    };
    let mut am: streaming_service::ActiveModel = existing.into();
    am.name = Set(name.trim().to_string());
    Ok(am.update(db).await?)
}

/// Delete a service; accounts and screens go with it through FK cascades.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = ServiceEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn service_crud() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let name = format!("svc_{}", Uuid::new_v4());
        let created = create_service(&db, &name).await?;
        assert!(list_services(&db).await?.iter().any(|s| s.id == created.id));

        let renamed = rename_service(&db, created.id, "  Renamed  ").await?;
        assert_eq!(renamed.name, "Renamed");
        assert!(rename_service(&db, created.id, "").await.is_err());

        assert!(delete_service(&db, created.id).await?);
        assert!(!delete_service(&db, created.id).await?);
        assert!(get_service(&db, created.id).await?.is_none());
        Ok(())
    }
}
