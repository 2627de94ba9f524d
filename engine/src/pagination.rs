use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::error::Error;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

const fn default_page() -> u64 {
    1
}

/// Paging parameters exactly as they arrive on the query string.
/// Nothing here is validated yet; see [`Window::try_new`].
#[derive(Debug, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for WindowLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("page must be 1 or greater, got {0}")]
    PageOutOfRange(u64),
    #[error("page_size must be between 1 and {max}, got {got}")]
    PageSizeOutOfRange { got: u64, max: u64 },
    #[error("page {page} with page_size {page_size} is beyond the addressable range")]
    OffsetOverflow { page: u64, page_size: u64 },
}

/// A validated paging window. Can only be built through [`Window::try_new`],
/// so holding one means the parameters were already accepted and no store
/// query has to re-check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    page: u64,
    page_size: u64,
}

impl Window {
    /// Rejects out-of-range parameters instead of clamping them. A missing
    /// page size falls back to `limits.default_page_size`.
    pub fn try_new(pagination: Pagination, limits: WindowLimits) -> Result<Self, WindowError> {
        let page_size = pagination.page_size.unwrap_or(limits.default_page_size);

        if pagination.page < 1 {
            return Err(WindowError::PageOutOfRange(pagination.page));
        }

        if page_size < 1 || page_size > limits.max_page_size {
            return Err(WindowError::PageSizeOutOfRange {
                got: page_size,
                max: limits.max_page_size,
            });
        }

        if (pagination.page - 1).checked_mul(page_size).is_none() {
            return Err(WindowError::OffsetOverflow {
                page: pagination.page,
                page_size,
            });
        }

        Ok(Self {
            page: pagination.page,
            page_size,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Records to skip before the window begins.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// One window of results plus count metadata. Assembled fresh per request
/// and never persisted.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn assemble(items: Vec<T>, total_count: u64, window: Window) -> Self {
        Self {
            items,
            total_count,
            page_number: window.page(),
            page_size: window.page_size(),
            total_pages: total_count.div_ceil(window.page_size()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// The store capability a listing runs against. `F` is the entity's filter
/// set; an empty filter set matches every record.
pub trait PageSource<F: ?Sized> {
    type Item;
    type Error: Error + Send + Sync + 'static;

    /// Count of records matching `filters`, ignoring the window.
    fn count(&self, filters: &F) -> impl Future<Output = Result<u64, Report<Self::Error>>> + Send;

    /// Records matching `filters` under the source's stable sort order,
    /// skipping `window.offset()` records and returning at most
    /// `window.page_size()`.
    fn fetch(
        &self,
        filters: &F,
        window: Window,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Report<Self::Error>>> + Send;

    /// Runs the count and the fetch for one page. The default issues two
    /// independent reads, so a write landing between them can leave the
    /// count and the returned window disagreeing. Sources whose store has
    /// cheap snapshot reads should override this and run both queries
    /// against one snapshot.
    fn count_and_fetch(
        &self,
        filters: &F,
        window: Window,
    ) -> impl Future<Output = Result<(u64, Vec<Self::Item>), Report<Self::Error>>> + Send
    where
        Self: Sync,
        F: Sync,
    {
        async move {
            let total_count = self.count(filters).await?;
            let items = self.fetch(filters, window).await?;
            Ok((total_count, items))
        }
    }
}

/// Produce one page of results from `source`. Either query failing fails the
/// whole operation; a page is never returned with a missing or defaulted
/// count.
pub async fn paginate<F, S>(
    source: &S,
    filters: &F,
    window: Window,
) -> Result<Page<S::Item>, Report<S::Error>>
where
    F: ?Sized + Sync,
    S: PageSource<F> + Sync,
{
    let (total_count, items) = source.count_and_fetch(filters, window).await?;
    Ok(Page::assemble(items, total_count, window))
}
