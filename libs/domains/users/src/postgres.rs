use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, UpdateUser, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Insert/update failures: a unique violation on the email index becomes
/// `DuplicateEmail`, anything else is internal.
fn map_write_err(err: DbErr, email: &str) -> UserError {
    let unique_violation = matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err
            .to_string()
            .contains("duplicate key value violates unique constraint");

    if unique_violation {
        UserError::DuplicateEmail(email.to_string())
    } else {
        UserError::from(err)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedOn)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let now = Utc::now();
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email.clone()),
            created_on: Set(now.into()),
            updated_on: Set(now.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, &input.email))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<User> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.email = Set(input.email.clone());
        active_model.updated_on = Set(Utc::now().into());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err(e, &input.email))?;

        tracing::info!(user_id = id, "Updated user");
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, id: i32) -> UserResult<bool> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.is_some())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> UserResult<bool> {
        let lowered_email = Expr::expr(Func::lower(Expr::col(entity::Column::Email)));
        let mut query = entity::Entity::find().filter(lowered_email.eq(email.to_lowercase()));

        if let Some(id) = exclude_id {
            query = query.filter(entity::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.is_some())
    }
}
