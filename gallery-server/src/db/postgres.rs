//! PostgreSQL-backed image repository

use async_trait::async_trait;
use shared::ListQuery;
use shared::models::{Image, ImageCreate};
use sqlx::PgPool;

use super::{ImageRepository, RepoResult, SEED_AI_MODEL, SEED_TAGS};

const COLUMNS: &str = "id, file_name, uri, title, prompts, description, ai_model, tags, \
                       created_at, likes, is_deleted";

#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| super::RepoError::Database(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    async fn list(&self, query: &ListQuery) -> RepoResult<Vec<Image>> {
        // Column and direction come from closed enums, never from user text.
        let column = query.sort_by.column();
        let direction = query.sort_order.sql();
        let sql = format!(
            "SELECT {COLUMNS} FROM uploaded_images \
             WHERE is_deleted = FALSE \
             ORDER BY {column} {direction}, seq {direction} \
             LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, Image>(&sql)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self) -> RepoResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM uploaded_images WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>> {
        let sql =
            format!("SELECT {COLUMNS} FROM uploaded_images WHERE id = $1 AND is_deleted = FALSE");
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(image)
    }

    async fn create(&self, data: ImageCreate) -> RepoResult<Image> {
        let sql = format!(
            r#"
            INSERT INTO uploaded_images
                (id, file_name, uri, title, prompts, description, ai_model, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        );
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&data.file_name)
            .bind(&data.uri)
            .bind(&data.title)
            .bind(&data.prompts)
            .bind(&data.description)
            .bind(&data.ai_model)
            .bind(&data.tags)
            .bind(shared::util::now_millis())
            .fetch_one(&self.pool)
            .await?;
        Ok(image)
    }

    async fn increment_likes(&self, id: &str) -> RepoResult<Option<i64>> {
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE uploaded_images
            SET likes = likes + 1
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING likes
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn seed_test_metadata(&self) -> RepoResult<u64> {
        let tags: Vec<String> = SEED_TAGS.iter().map(|t| t.to_string()).collect();
        let result = sqlx::query(
            "UPDATE uploaded_images SET tags = $1, ai_model = $2 WHERE is_deleted = FALSE",
        )
        .bind(&tags)
        .bind(SEED_AI_MODEL)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
