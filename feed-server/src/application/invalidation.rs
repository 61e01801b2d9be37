use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// Route key of the posts listing.
pub const POSTS_ROUTE: &str = "/posts";

/// Told after a write so the next render of `route_key` reflects it.
pub trait ViewInvalidation: Send + Sync {
    fn invalidate(&self, route_key: &str);
}

/// Per-route revision counters. Listings expose the current revision as
/// an `ETag`, so a bump invalidates whatever clients cached.
#[derive(Debug, Default)]
pub struct RouteRevisions {
    revisions: Mutex<HashMap<String, u64>>,
}

impl RouteRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self, route_key: &str) -> u64 {
        let revisions = self.revisions.lock().unwrap_or_else(PoisonError::into_inner);
        revisions.get(route_key).copied().unwrap_or(0)
    }
}

impl ViewInvalidation for RouteRevisions {
    fn invalidate(&self, route_key: &str) {
        let mut revisions = self.revisions.lock().unwrap_or_else(PoisonError::into_inner);
        let revision = revisions.entry(route_key.to_string()).or_insert(0);
        *revision += 1;
        debug!(route = route_key, revision = *revision, "route invalidated");
    }
}
