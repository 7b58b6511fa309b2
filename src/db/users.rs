//! Database queries for users.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::entity::{post, project};
use crate::error::{AppError, AppResult};
use crate::models::{IdentityUserData, SessionClaims};

impl super::DbPool {
    /// Find a user by the provider-issued id.
    pub async fn get_user_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        let result = User::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))?;

        Ok(result)
    }

    /// Find a user by claimed username.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        let result = User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user by username: {}", e)))?;

        Ok(result)
    }

    /// Ensure the caller's mirrored user row exists, creating it from token
    /// claims on first authenticated write.
    pub async fn ensure_user(&self, claims: &SessionClaims) -> AppResult<user::Model> {
        if let Some(existing) = self.get_user_by_id(&claims.sub).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(claims.sub.clone()),
            name: Set(claims.name.clone().unwrap_or_default()),
            email: Set(claims.email.clone().unwrap_or_default()),
            username: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        tracing::info!(user_id = %inserted.id, "Mirrored new user on first authenticated access");

        Ok(inserted)
    }

    /// Set a user's username. Callers check availability first; the unique
    /// index is the only guard against a concurrent claim of the same name.
    pub async fn set_username(&self, user_id: &str, username: &str) -> AppResult<user::Model> {
        let existing = self
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let mut active: ActiveModel = existing.into();
        active.username = Set(Some(username.to_string()));

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to set username: {}", e)))?;

        Ok(updated)
    }

    /// Mirror a `user.created` event. Idempotent: an existing row is left as is.
    pub async fn create_user_from_event(&self, data: &IdentityUserData) -> AppResult<()> {
        if self.get_user_by_id(&data.id).await?.is_some() {
            tracing::info!(user_id = %data.id, "User already mirrored, skipping create");
            return Ok(());
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(data.id.clone()),
            name: Set(data.full_name()),
            email: Set(data.primary_email()),
            username: Set(data.username.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;

        Ok(())
    }

    /// Mirror a `user.updated` event. Falls back to create when the row is
    /// missing, which self-heals out-of-order webhook delivery.
    pub async fn update_user_from_event(&self, data: &IdentityUserData) -> AppResult<()> {
        let existing = match self.get_user_by_id(&data.id).await? {
            Some(m) => m,
            None => {
                tracing::warn!(user_id = %data.id, "Update for unknown user, creating instead");
                return self.create_user_from_event(data).await;
            }
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(data.full_name());
        active.email = Set(data.primary_email());
        active.username = Set(data.username.clone());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update user: {}", e)))?;

        Ok(())
    }

    /// Mirror a `user.deleted` event: remove owned posts and projects first,
    /// then the user row. Idempotent when the user is already gone.
    pub async fn delete_user_with_content(&self, user_id: &str) -> AppResult<()> {
        let conn = self.connection();

        post::Entity::delete_many()
            .filter(post::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user's posts: {}", e)))?;

        project::Entity::delete_many()
            .filter(project::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user's projects: {}", e)))?;

        if let Some(existing) = self.get_user_by_id(user_id).await? {
            existing
                .delete(conn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;
        }

        Ok(())
    }
}
