//! SQL rendering of listing filters.
//!
//! Row and count queries call the same `push_*` function with the same
//! filter value, which keeps their WHERE clauses identical.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::filter::{PostFilter, UserFilter};

pub const POST_COLUMNS: &str = "SELECT p.id, p.title, p.body, p.user_id AS author_id, \
     u.name AS author_name, u.username AS author_username, u.email AS author_email \
     FROM posts p JOIN users u ON u.id = p.user_id";

pub const POST_COUNT: &str = "SELECT COUNT(*) FROM posts p";

pub const USER_COLUMNS: &str = "SELECT u.id, u.name, u.username, \
     (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS post_count \
     FROM users u";

pub const USER_COUNT: &str = "SELECT COUNT(*) FROM users u";

pub fn push_post_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    match filter {
        PostFilter::All => {}
        PostFilter::Author(author_id) => {
            builder.push(" WHERE p.user_id = ").push_bind(*author_id);
        }
    }
}

pub fn push_user_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let text = filter.text().to_owned();
    builder
        .push(" WHERE (strpos(u.name, ")
        .push_bind(text.clone())
        .push(") > 0 OR strpos(u.username, ")
        .push_bind(text)
        .push(") > 0)");
}

pub fn push_window(builder: &mut QueryBuilder<'_, Postgres>, skip: u64, take: u64) {
    builder
        .push(" LIMIT ")
        .push_bind(to_sql_int(take))
        .push(" OFFSET ")
        .push_bind(to_sql_int(skip));
}

pub fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
