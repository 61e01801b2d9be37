use std::sync::Arc;

use crate::application::fault_policy::{FaultPolicy, FaultTag};
use crate::data::user_repository::UserRepository;
use crate::domain::error::{ActionError, DomainError};
use crate::domain::filter::UserFilter;
use crate::domain::pagination::{PageLimits, PageRequest, Paginated};
use crate::domain::user::UserSearchResult;
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearchQuery {
    pub query: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    faults: FaultPolicy,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, faults: FaultPolicy) -> Self {
        Self { repo, faults }
    }

    #[instrument(skip(self))]
    pub async fn search_users(
        &self,
        query: UserSearchQuery,
    ) -> Result<Paginated<UserSearchResult>, ActionError> {
        self.search_page(query).await.map_err(|err| {
            error!(error = %err, "error searching users");
            ActionError::UserSearchFailed
        })
    }

    async fn search_page(
        &self,
        query: UserSearchQuery,
    ) -> Result<Paginated<UserSearchResult>, DomainError> {
        self.faults.check(FaultTag::SearchUsers)?;

        let request = PageRequest::normalize(query.page, query.page_size, PageLimits::USERS);
        let Some(filter) = UserFilter::for_query(query.query.as_deref()) else {
            debug!("query below search threshold");
            return Ok(Paginated::empty(request));
        };

        let (users, total_items) = tokio::try_join!(
            self.repo
                .search(&filter, request.offset(), request.page_size()),
            self.repo.count(&filter),
        )?;

        Ok(Paginated::new(users, request, total_items))
    }
}
