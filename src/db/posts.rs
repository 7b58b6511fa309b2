//! Database queries for posts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::post::{self, ActiveModel, Entity as Post};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePostRequest, UpdatePostRequest};

impl super::DbPool {
    /// Insert a new post for the given owner.
    ///
    /// Callers validate title/content presence before this point.
    pub async fn insert_post(
        &self,
        user_id: &str,
        req: &CreatePostRequest,
    ) -> AppResult<post::Model> {
        let now = chrono::Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(req.title.clone().unwrap_or_default()),
            desc: Set(req.desc.clone()),
            content: Set(req.content.clone().unwrap_or_default()),
            img: Set(req.img.clone()),
            public: Set(req.public.unwrap_or(false)),
            user_id: Set(user_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert post: {}", e)))?;

        Ok(inserted)
    }

    /// Public feed: public posts only, newest first, owner joined.
    pub async fn list_public_posts(&self) -> AppResult<Vec<(post::Model, Option<user::Model>)>> {
        let rows = Post::find()
            .find_also_related(user::Entity)
            .filter(post::Column::Public.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list public posts: {}", e)))?;

        Ok(rows)
    }

    /// All posts owned by a user (public and private), newest first.
    pub async fn list_posts_for_owner(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<(post::Model, Option<user::Model>)>> {
        let rows = Post::find()
            .find_also_related(user::Entity)
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list posts: {}", e)))?;

        Ok(rows)
    }

    /// Public posts for a user, newest first, optionally limited.
    pub async fn list_public_posts_for_user(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<post::Model>> {
        let mut select = Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::Public.eq(true))
            .order_by_desc(post::Column::CreatedAt);

        if let Some(n) = limit {
            select = select.limit(n);
        }

        let rows = select
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list user's posts: {}", e)))?;

        Ok(rows)
    }

    /// Get a post by id with its owner joined.
    pub async fn get_post_with_owner(
        &self,
        id: Uuid,
    ) -> AppResult<Option<(post::Model, Option<user::Model>)>> {
        let row = Post::find_by_id(id)
            .find_also_related(user::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get post: {}", e)))?;

        Ok(row)
    }

    /// Load only the owning user id for the ownership check.
    pub async fn get_post_owner(&self, id: Uuid) -> AppResult<Option<String>> {
        let owner = Post::find_by_id(id)
            .select_only()
            .column(post::Column::UserId)
            .into_tuple::<String>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get post owner: {}", e)))?;

        Ok(owner)
    }

    /// Apply a conditional field patch. Absent fields are untouched.
    pub async fn update_post(&self, id: Uuid, req: &UpdatePostRequest) -> AppResult<post::Model> {
        let existing = Post::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get post: {}", e)))?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let mut active: ActiveModel = existing.into();
        if let Some(ref title) = req.title {
            active.title = Set(title.clone());
        }
        if let Some(ref desc) = req.desc {
            active.desc = Set(Some(desc.clone()));
        }
        if let Some(ref img) = req.img {
            active.img = Set(Some(img.clone()));
        }
        if let Some(public) = req.public {
            active.public = Set(public);
        }
        if let Some(ref content) = req.content {
            active.content = Set(content.clone());
        }
        active.updated_at = Set(chrono::Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update post: {}", e)))?;

        Ok(updated)
    }

    /// Delete a post. Ownership is checked by the caller.
    pub async fn delete_post(&self, id: Uuid) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete post: {}", e)))?;

        Ok(())
    }
}
