//! Lazy, page-numbered pagination.
//!
//! A list operation returns a [`Page`]: the outcome of one request plus, when
//! there may be more results, a continuation that fetches the following page
//! on demand. [`PageIterator`] walks the chain one page at a time.
//!
//! # Termination
//!
//! A continuation exists only when the page succeeded and returned at least
//! `page_size` items. A short page ends the chain; a full final page costs
//! one extra request that returns zero items. An error page is yielded once
//! and then the chain ends.
//!
//! # Example
//!
//! ```rust,ignore
//! use smithery_sdk::models::operations::ListServersRequest;
//! use smithery_sdk::pagination::PageIterator;
//!
//! let first = registry
//!     .servers()
//!     .list(&ListServersRequest::builder().q("slack").build()?, RequestOptions::new())
//!     .await;
//!
//! let mut pages = PageIterator::new(first);
//! while let Some(page) = pages.next_page().await {
//!     for server in page.into_result()?.servers {
//!         println!("{}", server.qualified_name);
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::Stream;

use crate::clients::Outcome;

/// A page payload that can report and surrender its items.
pub trait Paginated {
    /// The element type of the listing.
    type Item;

    /// Number of items on this page.
    fn item_count(&self) -> usize;

    /// Consumes the page, returning its items.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Fetches the page with the given number.
pub type FetchPage<T> = Arc<dyn Fn(u32) -> BoxFuture<'static, Outcome<T>> + Send + Sync>;

struct Continuation<T> {
    page: u32,
    page_size: u32,
    fetch: FetchPage<T>,
}

impl<T> Clone for Continuation<T> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            page_size: self.page_size,
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Paginated> Continuation<T> {
    async fn fetch(self) -> Page<T> {
        let result = (self.fetch)(self.page).await;
        Page::new(self.page, self.page_size, result, self.fetch)
    }
}

/// One page of a listing.
pub struct Page<T> {
    number: u32,
    result: Outcome<T>,
    next: Option<Continuation<T>>,
}

impl<T: Paginated> Page<T> {
    /// Wraps the outcome of fetching page `number`.
    ///
    /// `fetch` is kept as the continuation only when `result` is a full page.
    #[must_use]
    pub fn new(number: u32, page_size: u32, result: Outcome<T>, fetch: FetchPage<T>) -> Self {
        let full = result.as_ref().is_ok_and(|payload| {
            usize::try_from(page_size).is_ok_and(|size| payload.item_count() >= size)
        });
        let next = full.then(|| Continuation {
            page: number.saturating_add(1),
            page_size,
            fetch,
        });
        Self {
            number,
            result,
            next,
        }
    }

    /// Fetches page `number` with `fetch` and wraps the result.
    pub async fn fetch(number: u32, page_size: u32, fetch: FetchPage<T>) -> Self {
        Continuation {
            page: number,
            page_size,
            fetch,
        }
        .fetch()
        .await
    }

    /// Fetches the following page, or returns `None` at the end of the chain.
    pub async fn next(&self) -> Option<Self> {
        match &self.next {
            Some(continuation) => Some(continuation.clone().fetch().await),
            None => None,
        }
    }
}

impl<T> Page<T> {
    /// The one-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The outcome of this page's request.
    #[must_use]
    pub const fn result(&self) -> &Outcome<T> {
        &self.result
    }

    /// Consumes the page, returning its outcome.
    ///
    /// # Errors
    ///
    /// Returns the error this page's request failed with.
    pub fn into_result(self) -> Outcome<T> {
        self.result
    }

    /// Returns `true` if another page may follow.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// The number of the following page, if there is one.
    #[must_use]
    pub fn next_page_number(&self) -> Option<u32> {
        self.next.as_ref().map(|c| c.page)
    }
}

impl<T: fmt::Debug> fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("number", &self.number)
            .field("result", &self.result)
            .field("next_page", &self.next.as_ref().map(|c| c.page))
            .finish()
    }
}

enum State<T> {
    Ready(Page<T>),
    Pending(Continuation<T>),
    Exhausted,
}

/// Walks a page chain, fetching each page only when asked.
pub struct PageIterator<T> {
    state: State<T>,
}

impl<T: Paginated> PageIterator<T> {
    /// Starts at an already fetched page.
    #[must_use]
    pub const fn new(first: Page<T>) -> Self {
        Self {
            state: State::Ready(first),
        }
    }

    /// Returns the next page, fetching it if necessary.
    ///
    /// Returns `None` once the chain has ended; the continuation is never
    /// invoked again after that.
    pub async fn next_page(&mut self) -> Option<Page<T>> {
        let page = match std::mem::replace(&mut self.state, State::Exhausted) {
            State::Ready(page) => page,
            State::Pending(continuation) => continuation.fetch().await,
            State::Exhausted => return None,
        };
        if let Some(continuation) = &page.next {
            self.state = State::Pending(continuation.clone());
        }
        Some(page)
    }

    /// Drains the chain, returning every item in page order.
    ///
    /// # Errors
    ///
    /// Returns the first page error encountered; later pages are not fetched.
    pub async fn collect_items(mut self) -> Outcome<Vec<T::Item>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page.into_result()?.into_items());
        }
        Ok(items)
    }

    /// Returns `true` once the chain has ended.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }
}

impl<T: Paginated + Send + 'static> PageIterator<T> {
    /// Exposes the chain as a stream of pages.
    pub fn into_stream(self) -> impl Stream<Item = Page<T>> + Send {
        futures::stream::unfold(self, |mut pages| async move {
            pages.next_page().await.map(|page| (page, pages))
        })
    }
}

impl<T> fmt::Debug for PageIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Ready(page) => format!("Ready(page {})", page.number),
            State::Pending(continuation) => format!("Pending(page {})", continuation.page),
            State::Exhausted => "Exhausted".to_string(),
        };
        f.debug_struct("PageIterator").field("state", &state).finish()
    }
}
