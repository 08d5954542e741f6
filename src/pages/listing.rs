//! Home page listing with "load more" pagination

use crate::content::{ContentSource, Cursor, Normalizer, PostSummary, QueryResponse};
use crate::error::Result;

/// Where the listing is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// Showing the server-rendered first page
    Initial,
    /// Showing the first page plus this many loaded pages
    LoadedMore(usize),
}

/// Posts on display plus the cursor for the next batch
///
/// A load is split into [`Listing::begin_load`] and
/// [`Listing::complete_load`] / [`Listing::abort_load`] so the control can
/// stay disabled while a fetch is in flight.
#[derive(Debug, Clone)]
pub struct Listing {
    posts: Vec<PostSummary>,
    next_page: Option<Cursor>,
    state: ListingState,
    pending: bool,
}

impl Listing {
    pub fn initial(posts: Vec<PostSummary>, next_page: Option<Cursor>) -> Self {
        Self {
            posts,
            next_page,
            state: ListingState::Initial,
            pending: false,
        }
    }

    /// Listing for the first page of a query
    pub fn from_response(normalizer: &Normalizer, response: QueryResponse) -> Self {
        let posts = normalizer.summaries(&response.results);
        Self::initial(posts, Cursor::from_next_page(response.next_page))
    }

    /// Continue a listing whose earlier posts are already on the client
    pub fn resume(cursor: Cursor) -> Self {
        Self::initial(Vec::new(), Some(cursor))
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<PostSummary> {
        self.posts
    }

    pub fn next_page(&self) -> Option<&Cursor> {
        self.next_page.as_ref()
    }

    pub fn state(&self) -> ListingState {
        self.state
    }

    /// Whether another page exists; the "load more" control is hidden otherwise
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Claim the cursor for a fetch. Returns `None` when exhausted or already loading.
    pub fn begin_load(&mut self) -> Option<Cursor> {
        if self.pending {
            return None;
        }
        let cursor = self.next_page.clone()?;
        self.pending = true;
        Some(cursor)
    }

    /// Append a fetched page and replace the cursor
    pub fn complete_load(&mut self, posts: Vec<PostSummary>, next_page: Option<Cursor>) {
        self.posts.extend(posts);
        self.next_page = next_page;
        self.pending = false;
        self.state = match self.state {
            ListingState::Initial => ListingState::LoadedMore(1),
            ListingState::LoadedMore(n) => ListingState::LoadedMore(n + 1),
        };
    }

    /// Give up on an in-flight fetch, leaving the list as it was
    pub fn abort_load(&mut self) {
        self.pending = false;
    }

    /// Fetch, normalize and append the next page
    ///
    /// Returns how many posts were appended (0 when nothing was left to load).
    pub async fn load_more<S>(&mut self, source: &S, normalizer: &Normalizer) -> Result<usize>
    where
        S: ContentSource + ?Sized,
    {
        let Some(cursor) = self.begin_load() else {
            return Ok(0);
        };

        match source.fetch_page(&cursor).await {
            Ok(response) => {
                let posts = normalizer.summaries(&response.results);
                let count = posts.len();
                self.complete_load(posts, Cursor::from_next_page(response.next_page));
                tracing::debug!("Loaded {} more posts (has_more={})", count, self.has_more());
                Ok(count)
            }
            Err(e) => {
                self.abort_load();
                Err(e)
            }
        }
    }

    /// Keep loading until the cursor runs out
    pub async fn load_all<S>(&mut self, source: &S, normalizer: &Normalizer) -> Result<()>
    where
        S: ContentSource + ?Sized,
    {
        while self.has_more() {
            self.load_more(source, normalizer).await?;
        }
        Ok(())
    }
}
