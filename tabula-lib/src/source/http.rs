//! HTTP data source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::BulkSource;
use super::DataSource;
use crate::error::SourceError;
use crate::model::Row;
use crate::query::DatasourceRequest;
use crate::query::DatasourceResult;
use crate::query::convert_filter_model;
use crate::query::convert_sort_model;

/// A JSON endpoint queried over HTTP.
///
/// As a [`DataSource`] the endpoint is expected to paginate itself: the
/// request is sent as query parameters (`page`, `pageSize`, `sortBy`,
/// `sortOrder`, plus one parameter per filtered column) and the response is
/// `{ "data": [...], "total": n }`.
///
/// As a [`BulkSource`] the endpoint returns a JSON array of every row; wrap
/// it in [`Emulated`](super::Emulated) for client-side paging.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tabula_lib::query::{DatasourceRequest, PageSize};
/// use tabula_lib::source::{DataSource, HttpSource};
///
/// let source = HttpSource::new("https://api.example.com/users")?
///     .with_timeout(Duration::from_secs(10));
///
/// let page = source.get_rows(&DatasourceRequest::new(0, PageSize::Rows(20))).await?;
/// println!("{} of {}", page.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
    timeout: Option<Duration>,
    bearer_token: Option<String>,
}

impl HttpSource {
    /// Creates a source for an endpoint URL.
    pub fn new(url: &str) -> Result<Self, SourceError> {
        let url = Url::parse(url).map_err(|e| SourceError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            url,
            timeout: None,
            bearer_token: None,
        })
    }

    /// Uses a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Builds the URL of a paged request.
    pub fn request_url(&self, request: &DatasourceRequest) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &request.page.to_string());
            query.append_pair("pageSize", &request.page_size.to_wire().to_string());

            if let Some((sort_by, sort_order)) = convert_sort_model(request.sort_model.as_deref()) {
                query.append_pair("sortBy", sort_by);
                query.append_pair("sortOrder", sort_order.as_str());
            }

            for (column, criterion) in convert_filter_model(request.filter_model.as_ref()) {
                query.append_pair(&column, &criterion.to_display_string());
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        log::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| SourceError::parse_with_body(e.to_string(), body))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn get_rows(&self, request: &DatasourceRequest) -> Result<DatasourceResult, SourceError> {
        self.get_json(self.request_url(request)).await
    }
}

#[async_trait]
impl BulkSource for HttpSource {
    async fn fetch_all(&self) -> Result<Vec<Row>, SourceError> {
        self.get_json(self.url.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ColumnFilter;
    use crate::query::FilterModel;
    use crate::query::PageSize;
    use crate::query::SortModelItem;

    #[test]
    fn test_invalid_url() {
        let err = HttpSource::new("not a url").unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl(_)));
    }

    #[test]
    fn test_request_url_page_only() {
        let source = HttpSource::new("https://api.example.com/users").unwrap();
        let url = source.request_url(&DatasourceRequest::new(2, PageSize::Rows(25)));

        assert_eq!(url.as_str(), "https://api.example.com/users?page=2&pageSize=25");
    }

    #[test]
    fn test_request_url_all_sentinel() {
        let source = HttpSource::new("https://api.example.com/users").unwrap();
        let url = source.request_url(&DatasourceRequest::new(0, PageSize::All));

        assert_eq!(url.query(), Some("page=0&pageSize=-1"));
    }

    #[test]
    fn test_request_url_sort_and_filters() {
        let source = HttpSource::new("https://api.example.com/users?tenant=7").unwrap();
        let mut filters = FilterModel::new();
        filters.insert("age".into(), ColumnFilter::number(30.0));
        filters.insert("name".into(), ColumnFilter::text("ami na"));
        filters.insert("role".into(), ColumnFilter::text(""));

        let request = DatasourceRequest::new(1, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::desc("name"), SortModelItem::asc("id")])
            .with_filter(filters);

        let url = source.request_url(&request);

        assert_eq!(
            url.query(),
            Some("tenant=7&page=1&pageSize=10&sortBy=name&sortOrder=desc&age=30&name=ami+na")
        );
    }
}
