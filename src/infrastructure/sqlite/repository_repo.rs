use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use crate::domain::entities::Repository;
use crate::infrastructure::sqlite::from_millis;
use crate::ports::repository::RepositoryPort;
use crate::shared::result::Result;

/// SQLite 仓库仓储实现
pub struct SqliteRepositoryRepository {
    pool: SqlitePool,
}

impl SqliteRepositoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_row(r: &SqliteRow) -> Result<Repository> {
    Ok(Repository {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        owner: r.try_get("owner")?,
        html_url: r.try_get("html_url")?,
        last_synced_at: r
            .try_get::<Option<i64>, _>("last_synced_at")?
            .map(from_millis)
            .transpose()?,
    })
}

#[async_trait]
impl RepositoryPort for SqliteRepositoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Repository>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, owner, html_url, last_synced_at
            FROM repositories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Repository>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, owner, html_url, last_synced_at
            FROM repositories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    async fn upsert(&self, repo: &Repository) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO repositories (id, name, owner, html_url)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                owner = excluded.owner,
                html_url = excluded.html_url
            "#,
        )
        .bind(repo.id)
        .bind(&repo.name)
        .bind(&repo.owner)
        .bind(&repo.html_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_synced(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE repositories SET last_synced_at = ? WHERE id = ?")
            .bind(at.timestamp_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
