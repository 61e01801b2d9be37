//! In-memory stores for service and handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::Value;

use crate::application::fault_policy::{FaultPolicy, FaultTag};
use crate::application::invalidation::RouteRevisions;
use crate::application::post_service::PostService;
use crate::application::user_service::UserService;

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::filter::{PostFilter, UserFilter};
use crate::domain::post::Post;
use crate::domain::user::{User, UserSearchResult};
use crate::presentation::handlers::api_scope;

/// What the next delete should do instead of removing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteFailure {
    Vanished,
    Constraint,
    Internal,
}

#[derive(Default)]
struct PostState {
    posts: Vec<Post>,
    fail_reads: bool,
    delete_failure: Option<DeleteFailure>,
}

#[derive(Default)]
pub struct InMemoryPosts {
    state: Mutex<PostState>,
    calls: AtomicUsize,
}

impl InMemoryPosts {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            state: Mutex::new(PostState {
                posts,
                ..PostState::default()
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_reads(&self) {
        self.state().fail_reads = true;
    }

    pub fn fail_next_delete(&self, failure: DeleteFailure) {
        self.state().delete_failure = Some(failure);
    }

    /// Every repository call, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state().posts.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<std::sync::MutexGuard<'_, PostState>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if state.fail_reads {
            return Err(DomainError::Internal("connection reset".into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn find_many(
        &self,
        filter: &PostFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.read()?;
        Ok(state
            .posts
            .iter()
            .filter(|post| filter.matches(post))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, DomainError> {
        let state = self.read()?;
        Ok(state.posts.iter().filter(|post| filter.matches(post)).count() as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.read()?;
        Ok(state.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        match state.delete_failure.take() {
            Some(DeleteFailure::Vanished) => return Err(DomainError::PostNotFound(id)),
            Some(DeleteFailure::Constraint) => {
                return Err(DomainError::ConstraintViolation("posts_comments_fkey".into()));
            }
            Some(DeleteFailure::Internal) => {
                return Err(DomainError::Internal("deadlock detected".into()));
            }
            None => {}
        }

        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        if state.posts.len() == before {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<UserSearchResult>>,
    fail_reads: Mutex<bool>,
    calls: AtomicUsize,
}

impl InMemoryUsers {
    pub fn with_users(users: Vec<UserSearchResult>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn matching(&self, filter: &UserFilter) -> Result<Vec<UserSearchResult>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(DomainError::Internal("connection reset".into()));
        }
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<_> = users
            .iter()
            .filter(|user| filter.matches_result(user))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn search(
        &self,
        filter: &UserFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<UserSearchResult>, DomainError> {
        Ok(self
            .matching(filter)?
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError> {
        Ok(self.matching(filter)?.len() as u64)
    }
}

pub fn author(id: i64) -> User {
    User::new(
        id,
        format!("Author {id}"),
        format!("author{id}"),
        format!("author{id}@example.com"),
    )
}

/// Posts `1..=count`, authored round-robin by users `1..=authors`.
pub fn sample_posts(count: i64, authors: i64) -> Vec<Post> {
    (1..=count)
        .map(|id| {
            let author = author((id - 1) % authors + 1);
            Post::new(id, format!("Post {id}"), format!("Body of post {id}"), author)
        })
        .collect()
}

pub fn sample_users() -> Vec<UserSearchResult> {
    [
        (1, "Leanne Graham", "Bret", 10),
        (2, "Ervin Howell", "Antonette", 10),
        (3, "Clementine Bauch", "Samantha", 10),
        (4, "Patricia Lebsack", "Karianne", 10),
        (5, "Chelsey Dietrich", "Kamren", 10),
        (6, "Mrs. Dennis Schulist", "Leopoldo_Corkery", 10),
        (7, "Kurtis Weissnat", "Elwyn.Skiles", 10),
        (8, "Nicholas Runolfsdottir V", "Maxime_Nienow", 10),
        (9, "Glenna Reichert", "Delphine", 10),
        (10, "Clementina DuBuque", "Moriah.Stanton", 0),
    ]
    .into_iter()
    .map(|(id, name, username, post_count)| UserSearchResult {
        id,
        name: name.to_string(),
        username: username.to_string(),
        post_count,
    })
    .collect()
}

/// Stores and services behind one in-process API, for handler tests.
pub struct TestApi {
    pub posts: Arc<InMemoryPosts>,
    pub users: Arc<InMemoryUsers>,
    pub revisions: Arc<RouteRevisions>,
    pub faults: FaultPolicy,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApi {
    pub fn new(posts: InMemoryPosts, users: InMemoryUsers) -> Self {
        Self {
            posts: Arc::new(posts),
            users: Arc::new(users),
            revisions: Arc::new(RouteRevisions::new()),
            faults: FaultPolicy::default(),
        }
    }

    pub fn failing(mut self, tag: FaultTag) -> Self {
        self.faults = FaultPolicy::failing(tag);
        self
    }

    pub async fn send(&self, req: test::TestRequest) -> Reply {
        let post_service = PostService::new(self.posts.clone(), self.faults, self.revisions.clone());
        let user_service = UserService::new(self.users.clone(), self.faults);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(post_service))
                .app_data(web::Data::new(user_service))
                .app_data(web::Data::from(self.revisions.clone()))
                .service(api_scope()),
        )
        .await;

        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply {
            status,
            headers,
            body,
        }
    }
}
