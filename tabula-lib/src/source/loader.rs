//! Block loader between a server-side grid and a data source.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::DataSource;
use crate::config::GridConfig;
use crate::error::SourceError;
use crate::model::Row;
use crate::query::DatasourceRequest;
use crate::query::DatasourceResult;
use crate::query::FilterModel;
use crate::query::PageSize;
use crate::query::SortModelItem;

/// What happens to the response of a request that has been superseded by a
/// newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Every request delivers its own response, even if a newer request was
    /// issued in the meantime.
    FirstEmission,
    /// Only the latest request delivers; older responses are discarded.
    #[default]
    LatestOnly,
}

/// A block of rows requested by the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRequest {
    /// First row of the block, inclusive.
    pub start_row: usize,
    /// Last row of the block, exclusive.
    pub end_row: usize,
    /// Active sort criteria.
    pub sort_model: Vec<SortModelItem>,
    /// Active column filters.
    pub filter_model: FilterModel,
}

impl BlockRequest {
    /// Creates a block request without sort or filter.
    pub fn new(start_row: usize, end_row: usize) -> Self {
        Self {
            start_row,
            end_row,
            ..Default::default()
        }
    }

    /// Sets the sort model.
    pub fn with_sort(mut self, sort_model: Vec<SortModelItem>) -> Self {
        self.sort_model = sort_model;
        self
    }

    /// Sets the filter model.
    pub fn with_filter(mut self, filter_model: FilterModel) -> Self {
        self.filter_model = filter_model;
        self
    }
}

/// How a block request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The success callback ran.
    Delivered,
    /// The failure callback ran.
    Failed,
    /// The response was superseded; no callback ran.
    Discarded,
}

type SuccessFn = Box<dyn FnOnce(Vec<Row>, usize) + Send>;
type FailureFn = Box<dyn FnOnce(&SourceError) + Send>;

/// The pair of callbacks a block request resolves into.
///
/// Both are `FnOnce` and consumed together, so a request can resolve at
/// most once.
pub struct RowCallbacks {
    on_success: SuccessFn,
    on_failure: FailureFn,
}

impl RowCallbacks {
    /// Creates callbacks from a success and a failure handler.
    pub fn new(
        on_success: impl FnOnce(Vec<Row>, usize) + Send + 'static,
        on_failure: impl FnOnce(&SourceError) + Send + 'static,
    ) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        }
    }
}

impl fmt::Debug for RowCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowCallbacks(..)")
    }
}

/// Turns grid block requests into data source calls.
///
/// Clones share the page size and the generation counter, so a refresh
/// through any clone supersedes requests issued through the others.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::source::{BlockRequest, Emulated, GridLoader, RowCallbacks, StaticSource};
///
/// let loader = GridLoader::new(Emulated::new(StaticSource::new(rows)));
///
/// loader
///     .get_rows(
///         BlockRequest::new(0, 10),
///         RowCallbacks::new(
///             |rows, total| println!("{} of {}", rows.len(), total),
///             |e| eprintln!("failed: {}", e),
///         ),
///     )
///     .await;
/// ```
#[derive(Clone)]
pub struct GridLoader {
    source: Arc<dyn DataSource>,
    page_size: Arc<AtomicI64>,
    generation: Arc<AtomicU64>,
    policy: StalePolicy,
    timeout: Option<Duration>,
}

impl GridLoader {
    /// Creates a loader with default settings.
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self::from_config(Arc::new(source), &GridConfig::default())
    }

    /// Creates a loader over a shared source using `config`.
    pub fn from_config(source: Arc<dyn DataSource>, config: &GridConfig) -> Self {
        Self {
            source,
            page_size: Arc::new(AtomicI64::new(config.page_size.to_wire())),
            generation: Arc::new(AtomicU64::new(0)),
            policy: config.stale_policy,
            timeout: config.request_timeout,
        }
    }

    /// Sets the stale response policy.
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the stale response policy.
    pub fn stale_policy(&self) -> StalePolicy {
        self.policy
    }

    /// Returns the current page size.
    pub fn page_size(&self) -> PageSize {
        PageSize::from_wire(self.page_size.load(Ordering::SeqCst))
    }

    /// Changes the page size and supersedes outstanding requests.
    pub fn set_page_size(&self, page_size: PageSize) {
        self.page_size.store(page_size.to_wire(), Ordering::SeqCst);
        self.refresh();
    }

    /// Supersedes every outstanding request.
    pub fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Grid refresh, generation {}", generation);
    }

    /// Returns the number of refreshes so far; requests are stamped with it.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Builds the data source request for a block.
    pub fn datasource_request(&self, block: &BlockRequest) -> DatasourceRequest {
        let page_size = self.page_size();
        let page = match page_size {
            PageSize::All | PageSize::Rows(0) => 0,
            PageSize::Rows(size) => block.start_row / size,
        };

        DatasourceRequest {
            page,
            page_size,
            sort_model: (!block.sort_model.is_empty()).then(|| block.sort_model.clone()),
            filter_model: (!block.filter_model.is_empty()).then(|| block.filter_model.clone()),
        }
    }

    /// Fetches a block and resolves it into exactly one callback, or none if
    /// the response was superseded under [`StalePolicy::LatestOnly`].
    ///
    /// Blocks of the same query share a generation and never supersede each
    /// other; only [`refresh`](Self::refresh) and
    /// [`set_page_size`](Self::set_page_size) do.
    ///
    /// Failures are logged and passed to the failure callback; they are
    /// never returned.
    pub async fn get_rows(&self, block: BlockRequest, callbacks: RowCallbacks) -> Delivery {
        let generation = self.current_generation();
        let request = self.datasource_request(&block);
        log::debug!(
            "Loading rows {}..{} as page {} (generation {})",
            block.start_row,
            block.end_row,
            request.page,
            generation
        );

        let result = self.fetch(&request).await;

        if self.policy == StalePolicy::LatestOnly && self.current_generation() != generation {
            log::debug!("Discarding stale response for generation {}", generation);
            return Delivery::Discarded;
        }

        match result {
            Ok(result) => {
                (callbacks.on_success)(result.data, result.total);
                Delivery::Delivered
            }
            Err(e) => {
                log::error!("Error fetching rows: {}", e);
                (callbacks.on_failure)(&e);
                Delivery::Failed
            }
        }
    }

    async fn fetch(&self, request: &DatasourceRequest) -> Result<DatasourceResult, SourceError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.source.get_rows(request))
                .await
                .map_err(|_| SourceError::Timeout(timeout))?,
            None => self.source.get_rows(request).await,
        }
    }
}

impl fmt::Debug for GridLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridLoader")
            .field("page_size", &self.page_size())
            .field("generation", &self.current_generation())
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
