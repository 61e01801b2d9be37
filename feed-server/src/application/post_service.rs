use std::sync::Arc;

use crate::application::fault_policy::{FaultPolicy, FaultTag};
use crate::application::invalidation::{POSTS_ROUTE, ViewInvalidation};
use crate::data::post_repository::PostRepository;
use crate::domain::error::{ActionError, DomainError};
use crate::domain::filter::PostFilter;
use crate::domain::pagination::{PageLimits, PageRequest, Paginated};
use crate::domain::post::Post;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub author_id: Option<i64>,
}

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    faults: FaultPolicy,
    invalidation: Arc<dyn ViewInvalidation>,
}

impl PostService {
    pub fn new(
        repo: Arc<dyn PostRepository>,
        faults: FaultPolicy,
        invalidation: Arc<dyn ViewInvalidation>,
    ) -> Self {
        Self {
            repo,
            faults,
            invalidation,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_posts(&self, query: PostsQuery) -> Result<Paginated<Post>, ActionError> {
        self.load_page(query).await.map_err(|err| {
            error!(error = %err, "failed to load posts");
            ActionError::PostsLoadFailed
        })
    }

    async fn load_page(&self, query: PostsQuery) -> Result<Paginated<Post>, DomainError> {
        self.faults.check(FaultTag::LoadPosts)?;

        let request = PageRequest::normalize(query.page, query.page_size, PageLimits::POSTS);
        let filter = PostFilter::for_author(query.author_id);

        let (posts, total_items) = tokio::try_join!(
            self.repo
                .find_many(&filter, request.offset(), request.page_size()),
            self.repo.count(&filter),
        )?;

        Ok(Paginated::new(posts, request, total_items))
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: i64) -> Result<Post, ActionError> {
        if let Err(err) = self.faults.check(FaultTag::LoadPosts) {
            error!(error = %err, post_id = id, "failed to load post");
            return Err(ActionError::PostLoadFailed);
        }
        if id < 1 {
            return Err(ActionError::InvalidPostId);
        }

        match self.repo.find_by_id(id).await {
            Ok(Some(post)) => Ok(post),
            Ok(None) => Err(ActionError::PostNotFound),
            Err(err) => {
                error!(error = %err, post_id = id, "failed to load post");
                Err(ActionError::PostLoadFailed)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), ActionError> {
        if let Err(err) = self.faults.check(FaultTag::DeletePost) {
            error!(error = %err, post_id = id, "error deleting post");
            return Err(ActionError::DeleteFailed);
        }
        if id < 1 {
            return Err(ActionError::InvalidPostId);
        }

        match self.repo.find_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ActionError::PostNotFound),
            Err(err) => {
                error!(error = %err, post_id = id, "error deleting post");
                return Err(ActionError::DeleteFailed);
            }
        }

        self.repo.delete(id).await.map_err(|err| {
            error!(error = %err, post_id = id, "error deleting post");
            match err {
                DomainError::PostNotFound(_) => ActionError::PostAlreadyDeleted,
                DomainError::ConstraintViolation(_) => ActionError::PostHasRelatedData,
                _ => ActionError::DeleteFailed,
            }
        })?;

        self.invalidation.invalidate(POSTS_ROUTE);
        info!(post_id = id, "post removed from feed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::invalidation::RouteRevisions;
    use crate::test_support::{DeleteFailure, InMemoryPosts, sample_posts};
    use rstest::rstest;

    struct Harness {
        store: Arc<InMemoryPosts>,
        revisions: Arc<RouteRevisions>,
        service: PostService,
    }

    fn harness(posts: i64, faults: FaultPolicy) -> Harness {
        let store = Arc::new(InMemoryPosts::with_posts(sample_posts(posts, 3)));
        let revisions = Arc::new(RouteRevisions::new());
        let service = PostService::new(store.clone(), faults, revisions.clone());
        Harness {
            store,
            revisions,
            service,
        }
    }

    fn page(page: i64, page_size: i64) -> PostsQuery {
        PostsQuery {
            page: Some(page),
            page_size: Some(page_size),
            author_id: None,
        }
    }

    #[tokio::test]
    async fn ten_posts_split_eight_and_two() {
        let h = harness(10, FaultPolicy::none());

        let first = h.service.get_posts(page(1, 8)).await.expect("page 1");
        assert_eq!(first.items.len(), 8);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_previous_page);

        let second = h.service.get_posts(page(2, 8)).await.expect("page 2");
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.pagination.page_size, 8);
        assert_eq!(second.pagination.total_items, 10);
        assert!(!second.pagination.has_next_page);
        assert!(second.pagination.has_previous_page);
    }

    #[tokio::test]
    async fn pages_past_the_end_are_empty_not_errors() {
        let h = harness(10, FaultPolicy::none());

        let beyond = h.service.get_posts(page(9, 8)).await.expect("no error");
        assert!(beyond.items.is_empty());
        assert!(!beyond.pagination.has_next_page);
        assert_eq!(beyond.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn default_page_size_is_eight() {
        let h = harness(20, FaultPolicy::none());
        let envelope = h.service.get_posts(PostsQuery::default()).await.expect("posts");
        assert_eq!(envelope.pagination.page, 1);
        assert_eq!(envelope.pagination.page_size, 8);
        assert_eq!(envelope.items.first().map(|p| p.id), Some(1));
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(3), 4)]
    #[case(Some(7), 5)]
    #[case(Some(11), 2)]
    #[tokio::test]
    async fn paging_through_returns_exactly_the_count(
        #[case] author_id: Option<i64>,
        #[case] page_size: i64,
    ) {
        let h = harness(37, FaultPolicy::none());
        let mut seen = Vec::new();
        let mut current = 1;
        let total = loop {
            let envelope = h
                .service
                .get_posts(PostsQuery {
                    page: Some(current),
                    page_size: Some(page_size),
                    author_id,
                })
                .await
                .expect("page");
            seen.extend(envelope.items.iter().map(|p| p.id));
            if !envelope.pagination.has_next_page {
                break envelope.pagination.total_items;
            }
            current += 1;
        };

        assert_eq!(seen.len() as u64, total);
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(deduped, seen);
        if let Some(author) = author_id {
            let expected = if author <= 3 { 13 - u64::from(author > 1) } else { 0 };
            assert_eq!(total, expected);
        }
    }

    #[tokio::test]
    async fn author_filter_restricts_rows_and_count() {
        let h = harness(9, FaultPolicy::none());
        let envelope = h
            .service
            .get_posts(PostsQuery {
                author_id: Some(2),
                ..PostsQuery::default()
            })
            .await
            .expect("posts");

        assert_eq!(envelope.pagination.total_items, 3);
        assert!(envelope.items.iter().all(|p| p.author_id == 2));
    }

    #[tokio::test]
    async fn store_failure_becomes_load_error() {
        let h = harness(5, FaultPolicy::none());
        h.store.fail_reads();

        let err = h.service.get_posts(PostsQuery::default()).await.expect_err("fails");
        assert_eq!(err, ActionError::PostsLoadFailed);
        assert_eq!(err.to_string(), "Failed to load posts. Please try again later.");
    }

    #[tokio::test]
    async fn forced_load_failure_skips_the_store() {
        let h = harness(5, FaultPolicy::failing(FaultTag::LoadPosts));

        let err = h.service.get_posts(PostsQuery::default()).await.expect_err("fails");
        assert_eq!(err, ActionError::PostsLoadFailed);
        assert_eq!(h.store.calls(), 0);
    }

    #[tokio::test]
    async fn get_post_validates_and_finds() {
        let h = harness(3, FaultPolicy::none());
        assert_eq!(h.service.get_post(0).await, Err(ActionError::InvalidPostId));
        assert_eq!(h.service.get_post(42).await, Err(ActionError::PostNotFound));
        assert_eq!(h.service.get_post(2).await.map(|p| p.id), Ok(2));
    }

    #[tokio::test]
    async fn delete_removes_post_and_invalidates_listing() {
        let h = harness(3, FaultPolicy::none());

        h.service.delete_post(2).await.expect("deleted");

        assert_eq!(h.store.len(), 2);
        assert_eq!(h.revisions.revision(POSTS_ROUTE), 1);
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let h = harness(3, FaultPolicy::none());

        h.service.delete_post(1).await.expect("first delete");
        let err = h.service.delete_post(1).await.expect_err("second delete");

        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(h.revisions.revision(POSTS_ROUTE), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[tokio::test]
    async fn rejects_non_positive_ids_without_store_access(#[case] id: i64) {
        let h = harness(3, FaultPolicy::none());
        assert_eq!(h.service.delete_post(id).await, Err(ActionError::InvalidPostId));
        assert_eq!(h.store.calls(), 0);
    }

    #[tokio::test]
    async fn forced_delete_failure_skips_the_store() {
        let h = harness(3, FaultPolicy::failing(FaultTag::DeletePost));

        let err = h.service.delete_post(1).await.expect_err("forced");

        assert!(err.to_string().contains("Failed to delete"));
        assert_eq!(h.store.calls(), 0);
        assert_eq!(h.store.len(), 3);
    }

    #[rstest]
    #[case(DeleteFailure::Vanished, ActionError::PostAlreadyDeleted)]
    #[case(DeleteFailure::Constraint, ActionError::PostHasRelatedData)]
    #[case(DeleteFailure::Internal, ActionError::DeleteFailed)]
    #[tokio::test]
    async fn maps_delete_failures(#[case] failure: DeleteFailure, #[case] expected: ActionError) {
        let h = harness(3, FaultPolicy::none());
        h.store.fail_next_delete(failure);

        assert_eq!(h.service.delete_post(1).await, Err(expected));
        assert_eq!(h.revisions.revision(POSTS_ROUTE), 0);
    }
}
