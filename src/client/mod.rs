use std::time::{Duration, Instant};

use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use tokio::time::timeout;

use crate::models::outcome::RequestOutcome;

pub type HttpsClient = Client<HttpsConnector<HttpConnector>>;

pub fn build_client() -> HttpsClient {
    let https = HttpsConnector::new();
    Client::builder().build::<_, Body>(https)
}

/// One GET against `uri`, body read and dropped. The timeout covers the
/// whole exchange; there is exactly one attempt.
pub async fn send_request(
    client: &HttpsClient,
    uri: &Uri,
    max_duration: Duration,
    index: usize,
) -> RequestOutcome {
    let start = Instant::now();
    let result = timeout(max_duration, fetch(client, uri)).await;
    let elapsed = start.elapsed();

    match result {
        Ok(Ok(status)) => RequestOutcome::response(index, status.as_u16(), elapsed),
        Ok(Err(msg)) => RequestOutcome::failure(index, elapsed, msg),
        Err(_) => RequestOutcome::failure(
            index,
            elapsed,
            format!("timed out after {}ms", max_duration.as_millis()),
        ),
    }
}

async fn fetch(client: &HttpsClient, uri: &Uri) -> Result<StatusCode, String> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri.clone())
        .body(Body::empty())
        .map_err(|e| e.to_string())?;

    let response = client.request(request).await.map_err(describe_error)?;
    let status = response.status();

    hyper::body::to_bytes(response.into_body())
        .await
        .map_err(describe_error)?;

    Ok(status)
}

fn describe_error(e: hyper::Error) -> String {
    let kind = if e.is_connect() {
        "connection refused or host unreachable"
    } else if e.is_timeout() {
        "timed out"
    } else if e.is_closed() || e.is_incomplete_message() {
        "connection closed unexpectedly"
    } else {
        "request error"
    };
    format!("{}: {}", kind, e)
}
