use crate::data::predicate::{
    USER_COLUMNS, USER_COUNT, from_sql_count, push_user_predicate, push_window,
};
use crate::domain::error::DomainError;
use crate::domain::filter::UserFilter;
use crate::domain::user::UserSearchResult;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Matching users ordered by name ascending.
    async fn search(
        &self,
        filter: &UserFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<UserSearchResult>, DomainError>;
    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError>;
}

#[derive(Debug, sqlx::FromRow)]
struct UserSearchRow {
    id: i64,
    name: String,
    username: String,
    post_count: i64,
}

impl From<UserSearchRow> for UserSearchResult {
    fn from(row: UserSearchRow) -> Self {
        UserSearchResult {
            id: row.id,
            name: row.name,
            username: row.username,
            post_count: from_sql_count(row.post_count),
        }
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn search(
        &self,
        filter: &UserFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<UserSearchResult>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(USER_COLUMNS);
        push_user_predicate(&mut query, filter);
        query.push(" ORDER BY u.name ASC, u.id ASC");
        push_window(&mut query, skip, take);

        let rows = query
            .build_query_as::<UserSearchRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to search users for {:?}: {}", filter.text(), e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        Ok(rows.into_iter().map(UserSearchResult::from).collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(USER_COUNT);
        push_user_predicate(&mut query, filter);

        let total: i64 = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to count users for {:?}: {}", filter.text(), e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        Ok(from_sql_count(total))
    }
}
