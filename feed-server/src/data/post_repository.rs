use crate::data::predicate::{
    POST_COLUMNS, POST_COUNT, from_sql_count, push_post_predicate, push_window,
};
use crate::domain::error::DomainError;
use crate::domain::filter::PostFilter;
use crate::domain::post::Post;
use crate::domain::user::User;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

/// Foreign key violation.
const FK_VIOLATION: &str = "23503";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_many(
        &self,
        filter: &PostFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count(&self, filter: &PostFilter) -> Result<u64, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Fails with [`DomainError::PostNotFound`] when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author_id: i64,
    author_name: String,
    author_username: String,
    author_email: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let author = User::new(
            row.author_id,
            row.author_name,
            row.author_username,
            row.author_email,
        );
        Post::new(row.id, row.title, row.body, author)
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_many(
        &self,
        filter: &PostFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Post>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(POST_COLUMNS);
        push_post_predicate(&mut query, filter);
        query.push(" ORDER BY p.id");
        push_window(&mut query, skip, take);

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(POST_COUNT);
        push_post_predicate(&mut query, filter);

        let total: i64 = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;

        Ok(from_sql_count(total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(POST_COLUMNS);
        query.push(" WHERE p.id = ").push_bind(id);

        let row = query
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        Ok(row.map(Post::from))
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                let blocked = e
                    .as_database_error()
                    .and_then(|db| db.code())
                    .map(|code| code == FK_VIOLATION)
                    == Some(true);
                if blocked {
                    DomainError::ConstraintViolation(e.to_string())
                } else {
                    DomainError::Internal(e.to_string())
                }
            })?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        info!(post_id = id, "post deleted");
        Ok(())
    }
}
