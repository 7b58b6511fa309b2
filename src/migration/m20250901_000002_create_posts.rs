//! Migration: Create posts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE posts (
                    id UUID PRIMARY KEY,
                    title VARCHAR(255) NOT NULL,
                    "desc" VARCHAR(500),
                    content TEXT NOT NULL,
                    img VARCHAR(500),
                    "public" BOOLEAN NOT NULL DEFAULT FALSE,
                    user_id VARCHAR(64) NOT NULL REFERENCES users(id),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_posts_user_id ON posts(user_id);

                -- Public feed is ordered newest-first
                CREATE INDEX idx_posts_public_created
                    ON posts("public", created_at DESC);

                CREATE TRIGGER update_posts_updated_at
                    BEFORE UPDATE ON posts
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_posts_updated_at ON posts;
                DROP TABLE IF EXISTS posts CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
