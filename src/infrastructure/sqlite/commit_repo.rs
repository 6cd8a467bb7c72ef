use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use crate::domain::entities::{Commit, FeedEntry};
use crate::infrastructure::sqlite::from_millis;
use crate::ports::commit::{CommitPort, CommitQuery};
use crate::shared::result::Result;

/// SQLite 提交仓储实现
pub struct SqliteCommitRepository {
    pool: SqlitePool,
}

impl SqliteCommitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const FEED_COLUMNS: &str = r#"
    c.sha, c.repository_id, c.message, c.author_name, c.author_email,
    c.date, c.html_url, r.name AS repository_name
"#;

fn map_commit(r: &SqliteRow) -> Result<Commit> {
    Ok(Commit {
        sha: r.try_get("sha")?,
        repository_id: r.try_get("repository_id")?,
        message: r.try_get("message")?,
        author_name: r.try_get("author_name")?,
        author_email: r.try_get("author_email")?,
        date: from_millis(r.try_get("date")?)?,
        html_url: r.try_get("html_url")?,
    })
}

fn map_feed_entry(r: &SqliteRow) -> Result<FeedEntry> {
    Ok(FeedEntry {
        commit: map_commit(r)?,
        repository_name: r.try_get("repository_name")?,
    })
}

/// 转义 LIKE 通配符
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

async fn insert_ignore<'e, E: SqliteExecutor<'e>>(executor: E, commit: &Commit) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO commits (sha, repository_id, message, author_name, author_email, date, html_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(sha) DO NOTHING
        "#,
    )
    .bind(&commit.sha)
    .bind(commit.repository_id)
    .bind(&commit.message)
    .bind(&commit.author_name)
    .bind(&commit.author_email)
    .bind(commit.date.timestamp_millis())
    .bind(&commit.html_url)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl CommitPort for SqliteCommitRepository {
    async fn find_by_sha(&self, sha: &str) -> Result<Option<Commit>> {
        let row = sqlx::query(
            r#"
            SELECT sha, repository_id, message, author_name, author_email, date, html_url
            FROM commits
            WHERE sha = ?
            "#,
        )
        .bind(sha)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_commit).transpose()
    }

    async fn list_by_repository(
        &self,
        repository_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Commit>> {
        let rows = sqlx::query(
            r#"
            SELECT sha, repository_id, message, author_name, author_email, date, html_url
            FROM commits
            WHERE repository_id = ?
            ORDER BY date DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(repository_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_commit).collect()
    }

    async fn insert_many_if_absent(&self, commits: &[Commit]) -> Result<usize> {
        if commits.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for commit in commits {
            if insert_ignore(&mut *tx, commit).await? {
                inserted += 1;
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn recent_with_repository(&self, limit: i64) -> Result<Vec<FeedEntry>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM commits c
            JOIN repositories r ON r.id = c.repository_id
            ORDER BY c.date DESC, r.name ASC
            LIMIT ?
            "#,
            FEED_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_feed_entry).collect()
    }

    async fn search(&self, query: &CommitQuery) -> Result<Vec<FeedEntry>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM commits c
            JOIN repositories r ON r.id = c.repository_id
            WHERE (?1 IS NULL
                   OR c.message LIKE ?1 ESCAPE '\'
                   OR c.author_name LIKE ?1 ESCAPE '\'
                   OR c.sha LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR r.name = ?2)
            ORDER BY c.date DESC, r.name ASC
            LIMIT ?3 OFFSET ?4
            "#,
            FEED_COLUMNS
        );

        let pattern = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(like_pattern);

        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(query.repository_name.as_deref())
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_feed_entry).collect()
    }

    async fn count_by_repository(&self, repository_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM commits WHERE repository_id = ?")
            .bind(repository_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
