use serde::{Deserialize, Serialize};

use crate::domain::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub author: User,
}

impl Post {
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>, author: User) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            author_id: author.id,
            author,
        }
    }
}
