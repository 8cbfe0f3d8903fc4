//! Grid configuration

use std::time::Duration;

use crate::query::PageSize;
use crate::source::StalePolicy;

/// Settings shared by the server-side grid, its loader and its state store.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabula_lib::config::GridConfig;
/// use tabula_lib::query::PageSize;
///
/// let config = GridConfig::default()
///     .with_page_size(PageSize::Rows(20))
///     .with_request_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.storage_prefix, "ag-grid-state-");
/// assert!(config.page_size_options.contains(&PageSize::All));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Initial rows per page.
    ///
    /// Default: 10
    pub page_size: PageSize,

    /// Page sizes offered to the user.
    ///
    /// Default: 5, 10, 20, 50, 100, 500, all
    pub page_size_options: Vec<PageSize>,

    /// Prefix of persisted state keys.
    ///
    /// Default: `ag-grid-state-`
    pub storage_prefix: String,

    /// How responses of superseded requests are treated.
    ///
    /// Default: [`StalePolicy::LatestOnly`]
    pub stale_policy: StalePolicy,

    /// Maximum time a data source request may take.
    ///
    /// Default: none
    pub request_timeout: Option<Duration>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Rows(10),
            page_size_options: [5, 10, 20, 50, 100, 500]
                .into_iter()
                .map(PageSize::Rows)
                .chain([PageSize::All])
                .collect(),
            storage_prefix: "ag-grid-state-".to_string(),
            stale_policy: StalePolicy::LatestOnly,
            request_timeout: None,
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page size options.
    pub fn with_page_size_options(mut self, options: Vec<PageSize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Sets the storage key prefix.
    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    /// Sets the stale response policy.
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
