// src/db/content_repo.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::content::SiteContent};

#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, page: Option<&str>) -> Result<Vec<SiteContent>, AppError> {
        let rows = sqlx::query_as::<_, SiteContent>(
            r#"
            SELECT * FROM site_content
            WHERE ($1::text IS NULL OR page = $1)
            ORDER BY page, section
            LIMIT 500
            "#,
        )
        .bind(page)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, page: &str, section: &str) -> Result<Option<SiteContent>, AppError> {
        let row = sqlx::query_as::<_, SiteContent>(
            "SELECT * FROM site_content WHERE page = $1 AND section = $2",
        )
        .bind(page)
        .bind(section)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SiteContent>, AppError> {
        let row = sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn upsert(
        &self,
        page: &str,
        section: &str,
        content_type: &str,
        content: &Value,
    ) -> Result<SiteContent, AppError> {
        let row = sqlx::query_as::<_, SiteContent>(
            r#"
            INSERT INTO site_content (id, page, section, content_type, content)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (page, section) DO UPDATE SET
                content_type = EXCLUDED.content_type,
                content = EXCLUDED.content,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(page)
        .bind(section)
        .bind(content_type)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        content_type: &str,
        content: &Value,
    ) -> Result<Option<SiteContent>, AppError> {
        let row = sqlx::query_as::<_, SiteContent>(
            r#"
            UPDATE site_content SET content_type = $2, content = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content_type)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, page: &str, section: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM site_content WHERE page = $1 AND section = $2")
            .bind(page)
            .bind(section)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
