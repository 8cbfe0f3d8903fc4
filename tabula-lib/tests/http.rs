//! HttpSource against a local HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tabula_lib::error::SourceError;
use tabula_lib::model::Row;
use tabula_lib::model::Value;
use tabula_lib::query::DatasourceRequest;
use tabula_lib::query::PageSize;
use tabula_lib::query::SortModelItem;
use tabula_lib::source::BlockRequest;
use tabula_lib::source::BulkSource;
use tabula_lib::source::DataSource;
use tabula_lib::source::Delivery;
use tabula_lib::source::Emulated;
use tabula_lib::source::GridLoader;
use tabula_lib::source::HttpSource;
use tabula_lib::source::RowCallbacks;
use tokio::net::TcpListener;

/// What the server saw: request target and `Authorization` header.
type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

/// Serves `body` with `status` to every request until the test ends.
///
/// Returns the endpoint URL and the log of received requests.
async fn serve(status: StatusCode, body: impl Into<String>) -> (String, Seen) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let body = Bytes::from(body.into());
    let seen = Seen::default();
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let body = body.clone();
            let log = Arc::clone(&log);

            let service = service_fn(move |req: Request<Incoming>| {
                let body = body.clone();
                let log = Arc::clone(&log);
                async move {
                    let auth = req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);
                    log.lock().unwrap().push((req.uri().to_string(), auth));

                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("Content-Type", "application/json")
                            .body(Full::new(body))
                            .unwrap(),
                    )
                }
            });

            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (format!("http://{addr}/users"), seen)
}

fn users_json(n: i64) -> serde_json::Value {
    (0..n)
        .map(|i| json!({ "id": i, "name": format!("user{i:02}") }))
        .collect()
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| match row.id() {
            Some(Value::Int(id)) => Some(*id),
            _ => None,
        })
        .collect()
}

fn targets(seen: &Seen) -> Vec<String> {
    seen.lock().unwrap().iter().map(|(uri, _)| uri.clone()).collect()
}

// =============================================================================
// Decoding
// =============================================================================

#[tokio::test]
async fn test_paged_response_decodes_data_and_total() {
    let page = json!({ "data": users_json(3), "total": 42 });
    let (url, seen) = serve(StatusCode::OK, page.to_string()).await;
    let source = HttpSource::new(&url).unwrap();

    let request =
        DatasourceRequest::new(1, PageSize::Rows(10)).with_sort(vec![SortModelItem::asc("name")]);
    let result = source.get_rows(&request).await.unwrap();

    assert_eq!(ids(result.rows()), vec![0, 1, 2]);
    assert_eq!(result.total, 42);
    assert_eq!(
        result.data[2].get("name"),
        Some(&Value::String("user02".to_string()))
    );
    assert_eq!(
        targets(&seen),
        vec!["/users?page=1&pageSize=10&sortBy=name&sortOrder=asc"]
    );
}

#[tokio::test]
async fn test_bulk_response_decodes_bare_array() {
    let (url, seen) = serve(StatusCode::OK, users_json(5).to_string()).await;
    let source = HttpSource::new(&url).unwrap();

    let rows = source.fetch_all().await.unwrap();

    assert_eq!(ids(&rows), vec![0, 1, 2, 3, 4]);
    assert_eq!(targets(&seen), vec!["/users"]);
}

#[tokio::test]
async fn test_emulated_pages_bulk_endpoint() {
    let (url, seen) = serve(StatusCode::OK, users_json(25).to_string()).await;
    let source = Emulated::new(HttpSource::new(&url).unwrap());

    let result = source
        .get_rows(&DatasourceRequest::new(1, PageSize::Rows(10)))
        .await
        .unwrap();

    assert_eq!(ids(result.rows()), (10..20).collect::<Vec<_>>());
    assert_eq!(result.total, 25);
    assert_eq!(targets(&seen), vec!["/users"]);
}

#[tokio::test]
async fn test_loader_over_paged_endpoint() {
    let page = json!({ "data": users_json(10), "total": 42 });
    let (url, seen) = serve(StatusCode::OK, page.to_string()).await;
    let loader = GridLoader::new(HttpSource::new(&url).unwrap());
    let received = Arc::new(Mutex::new(None));
    let ok = Arc::clone(&received);

    let delivery = loader
        .get_rows(
            BlockRequest::new(20, 30),
            RowCallbacks::new(
                move |rows, total| *ok.lock().unwrap() = Some((rows.len(), total)),
                |_| {},
            ),
        )
        .await;

    assert_eq!(delivery, Delivery::Delivered);
    assert_eq!(*received.lock().unwrap(), Some((10, 42)));
    assert_eq!(targets(&seen), vec!["/users?page=2&pageSize=10"]);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_error_status_carries_body() {
    let (url, _) = serve(StatusCode::SERVICE_UNAVAILABLE, "maintenance").await;
    let source = HttpSource::new(&url).unwrap();

    let err = source
        .get_rows(&DatasourceRequest::new(0, PageSize::Rows(10)))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        SourceError::Http { status: 503, message } if message == "maintenance"
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_error_status_fails_bulk_fetch() {
    let (url, _) = serve(StatusCode::NOT_FOUND, "no such table").await;
    let source = Emulated::new(HttpSource::new(&url).unwrap());

    let err = source
        .get_rows(&DatasourceRequest::new(0, PageSize::Rows(10)))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_json_keeps_body() {
    let (url, _) = serve(StatusCode::OK, "{not json").await;
    let source = HttpSource::new(&url).unwrap();

    let err = source
        .get_rows(&DatasourceRequest::new(0, PageSize::Rows(10)))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        SourceError::Parse { body: Some(body), .. } if body == "{not json"
    ));
}

#[tokio::test]
async fn test_bare_array_is_not_a_page() {
    let (url, _) = serve(StatusCode::OK, users_json(3).to_string()).await;
    let source = HttpSource::new(&url).unwrap();

    let err = source
        .get_rows(&DatasourceRequest::new(0, PageSize::Rows(10)))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Parse { body: Some(_), .. }));
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (url, seen) = serve(StatusCode::OK, "[]").await;
    let source = HttpSource::new(&url).unwrap().with_bearer_token("s3cret");

    let rows = source.fetch_all().await.unwrap();

    assert!(rows.is_empty());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.as_deref(), Some("Bearer s3cret"));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let (url, seen) = serve(StatusCode::OK, "[]").await;
    let source = HttpSource::new(&url).unwrap();

    source.fetch_all().await.unwrap();

    assert_eq!(seen.lock().unwrap()[0].1, None);
}
