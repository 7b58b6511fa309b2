//! Database queries for projects.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProjectRequest, UpdateProjectRequest, join_technology};

impl super::DbPool {
    /// Insert a new project for the given owner.
    pub async fn insert_project(
        &self,
        user_id: &str,
        req: &CreateProjectRequest,
    ) -> AppResult<project::Model> {
        let now = chrono::Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(req.title.clone().unwrap_or_default()),
            detail: Set(req.detail.clone().unwrap_or_default()),
            technology: Set(req
                .technology
                .as_deref()
                .and_then(|tags| join_technology(tags))),
            img: Set(req.img.clone()),
            user_id: Set(user_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))?;

        Ok(inserted)
    }

    /// All projects owned by a user, newest first, optionally limited.
    pub async fn list_projects_for_owner(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<project::Model>> {
        let mut select = Project::find()
            .filter(project::Column::UserId.eq(user_id))
            .order_by_desc(project::Column::CreatedAt);

        if let Some(n) = limit {
            select = select.limit(n);
        }

        let rows = select
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(rows)
    }

    /// Get a project by id with its owner joined.
    pub async fn get_project_with_owner(
        &self,
        id: Uuid,
    ) -> AppResult<Option<(project::Model, Option<user::Model>)>> {
        let row = Project::find_by_id(id)
            .find_also_related(user::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(row)
    }

    /// Load only the owning user id for the ownership check.
    pub async fn get_project_owner(&self, id: Uuid) -> AppResult<Option<String>> {
        let owner = Project::find_by_id(id)
            .select_only()
            .column(project::Column::UserId)
            .into_tuple::<String>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project owner: {}", e)))?;

        Ok(owner)
    }

    /// Apply a conditional field patch. Absent fields are untouched.
    pub async fn update_project(
        &self,
        id: Uuid,
        req: &UpdateProjectRequest,
    ) -> AppResult<project::Model> {
        let existing = Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        let mut active: ActiveModel = existing.into();
        if let Some(ref title) = req.title {
            active.title = Set(title.clone());
        }
        if let Some(ref detail) = req.detail {
            active.detail = Set(detail.clone());
        }
        if let Some(ref tags) = req.technology {
            active.technology = Set(join_technology(tags));
        }
        if let Some(ref img) = req.img {
            active.img = Set(Some(img.clone()));
        }
        active.updated_at = Set(chrono::Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))?;

        Ok(updated)
    }

    /// Delete a project. Ownership is checked by the caller.
    pub async fn delete_project(&self, id: Uuid) -> AppResult<()> {
        Project::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete project: {}", e)))?;

        Ok(())
    }
}
