use crate::models::UserSearchResult;

/// Filter state of the posts list: the page being shown and the user
/// chosen in the author filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsListState {
    page: u64,
    selected_user: Option<UserSearchResult>,
}

impl PostsListState {
    pub fn new(page: u64) -> Self {
        Self {
            page: page.max(1),
            selected_user: None,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn selected_user(&self) -> Option<&UserSearchResult> {
        self.selected_user.as_ref()
    }

    pub fn author_id(&self) -> Option<i64> {
        self.selected_user.as_ref().map(|user| user.id)
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Filters by `user`. Returns the page to navigate to when the list
    /// has to go back to the first page.
    pub fn select_user(&mut self, user: UserSearchResult) -> Option<u64> {
        self.selected_user = Some(user);
        if self.page != 1 {
            self.page = 1;
            Some(1)
        } else {
            None
        }
    }

    /// Drops the author filter. The current page is kept.
    pub fn clear_user(&mut self) {
        self.selected_user = None;
    }
}

pub fn post_count_label(count: u64) -> String {
    if count == 1 {
        "1 post".to_string()
    } else {
        format!("{count} posts")
    }
}
