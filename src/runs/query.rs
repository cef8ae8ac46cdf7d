//! Listing queries: filter, sort, and paginate a run slice.

use serde::Serialize;

use super::error::{Result, RunsError};
use super::model::{AgentRun, SortOrder, StatusFilter};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size accepted.
pub const MAX_PAGE_SIZE: usize = 100;

/// Caller-supplied listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunsQuery {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub status: StatusFilter,
    pub sort_order: SortOrder,
}

impl Default for RunsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            status: StatusFilter::All,
            sort_order: SortOrder::Desc,
        }
    }
}

impl RunsQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Reject pages below 1 and page sizes outside `1..=MAX_PAGE_SIZE`.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(RunsError::InvalidQuery("page must be at least 1".to_string()));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(RunsError::InvalidQuery(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Run the query against `runs`.
    ///
    /// Search is applied first, then the status filter, then the sort, and
    /// finally the page window is sliced out.
    pub fn apply(&self, runs: &[AgentRun]) -> Result<Page> {
        self.validate()?;

        let needle = self.search.to_lowercase();
        let mut matching: Vec<&AgentRun> = runs
            .iter()
            .filter(|run| run.matches_search(&needle))
            .filter(|run| self.status.accepts(run.status))
            .collect();

        match self.sort_order {
            SortOrder::Asc => matching.sort_by(|a, b| a.started_at.cmp(&b.started_at)),
            SortOrder::Desc => matching.sort_by(|a, b| b.started_at.cmp(&a.started_at)),
        }

        let total = matching.len();
        let start = (self.page - 1).saturating_mul(self.page_size);
        let page_runs = matching
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        Ok(Page {
            runs: page_runs,
            total,
            page: self.page,
            page_size: self.page_size,
            total_pages: total.div_ceil(self.page_size),
        })
    }
}

/// One page of a filtered, sorted listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub runs: Vec<AgentRun>,
    /// Matching runs before pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl Page {
    /// 1-based position of the first run on this page, or 0 when empty.
    #[must_use]
    pub fn first_item(&self) -> usize {
        if self.runs.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last run on this page, or 0 when empty.
    #[must_use]
    pub fn last_item(&self) -> usize {
        if self.runs.is_empty() {
            0
        } else {
            (self.page * self.page_size).min(self.total)
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
