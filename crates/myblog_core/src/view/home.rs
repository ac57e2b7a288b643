//! Post list with pagination and a local-only like toggle.

use crate::api::{ApiClient, ApiError, CancellationToken, Transport};
use crate::model::post::{Post, PostId};
use crate::notify::Notifier;
use log::debug;
use std::collections::BTreeSet;

/// Page sizes offered to the user.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const FETCH_FAILED: &str = "Failed to fetch posts";
const FETCH_ERROR: &str = "An error occurred while fetching posts";

/// `(page-1) * page_size`; page numbers start at 1.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

/// `ceil(total / page_size)`; zero when `page_size` is zero.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.page_size)
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Moves to `page` when it lies in `[1, total_pages]`.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    /// Changes the page size and resets to page 1.
    ///
    /// Only sizes from `PAGE_SIZE_CHOICES` are accepted.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if !PAGE_SIZE_CHOICES.contains(&page_size) {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    fn set_total(&mut self, total: u64) {
        self.total = total;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Populated,
    Empty,
    /// Rendered like `Empty`.
    Failed,
}

/// Home screen.
#[derive(Debug)]
pub struct HomeView {
    state: ListState,
    posts: Vec<Post>,
    liked: BTreeSet<PostId>,
    pagination: Pagination,
    cancel: CancellationToken,
}

impl Default for HomeView {
    fn default() -> Self {
        Self::mount()
    }
}

impl HomeView {
    pub fn mount() -> Self {
        Self {
            state: ListState::Loading,
            posts: Vec::new(),
            liked: BTreeSet::new(),
            pagination: Pagination::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    /// Fetches the current page.
    pub fn load<T: Transport>(&mut self, api: &ApiClient<T>, notifier: &impl Notifier) {
        self.state = ListState::Loading;
        let offset = self.pagination.offset();
        let limit = self.pagination.page_size();

        let result = api.list_posts(offset, limit, &self.cancel);
        match result {
            Ok(success) => {
                self.posts = success.data.unwrap_or_default();
                self.pagination.set_total(success.total.unwrap_or(0));
                self.state = if self.posts.is_empty() {
                    ListState::Empty
                } else {
                    ListState::Populated
                };
            }
            Err(ApiError::Cancelled) => return,
            Err(err) => {
                let fallback = if err.is_transport() {
                    FETCH_ERROR
                } else {
                    FETCH_FAILED
                };
                notifier.error(&err.user_message(fallback));
                self.posts.clear();
                self.state = ListState::Failed;
            }
        }
        self.liked.clear();
        debug!(
            "event=list_loaded module=view state={:?} page={} page_size={} total={}",
            self.state,
            self.pagination.page(),
            limit,
            self.pagination.total()
        );
    }

    /// Navigates to `page` and refetches; a no-op outside `[1, total_pages]`.
    pub fn go_to_page<T: Transport>(
        &mut self,
        page: u32,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> bool {
        if page == self.pagination.page() {
            return self.pagination.go_to(page);
        }
        if !self.pagination.go_to(page) {
            return false;
        }
        self.load(api, notifier);
        true
    }

    pub fn previous_page<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> bool {
        let page = self.pagination.page().saturating_sub(1);
        self.go_to_page(page, api, notifier)
    }

    pub fn next_page<T: Transport>(&mut self, api: &ApiClient<T>, notifier: &impl Notifier) -> bool {
        let page = self.pagination.page().saturating_add(1);
        self.go_to_page(page, api, notifier)
    }

    /// Changes page size, resets to page 1 and refetches when anything changed.
    pub fn set_page_size<T: Transport>(
        &mut self,
        page_size: u32,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> bool {
        let before = (self.pagination.page(), self.pagination.page_size());
        if !self.pagination.set_page_size(page_size) {
            return false;
        }
        if before != (self.pagination.page(), self.pagination.page_size()) {
            self.load(api, notifier);
        }
        true
    }

    /// Flips the local liked flag of a listed post.
    ///
    /// Nothing is sent to the server and the flag resets on the next fetch.
    pub fn toggle_like(&mut self, id: &str) -> bool {
        if !self.posts.iter().any(|post| post.id == id) {
            return false;
        }
        if !self.liked.remove(id) {
            self.liked.insert(id.to_string());
        }
        true
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }
}
