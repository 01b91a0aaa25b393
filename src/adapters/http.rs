//! HTTP backend for on-demand revalidation endpoints.
//!
//! Each invalidation is posted to the front-end as JSON:
//!
//! ```text
//! POST <endpoint>
//! x-revalidate-secret: <secret>
//!
//! {"type":"path","value":"/about"}
//! {"type":"tag","value":"articles-sitemap"}
//! ```
//!
//! Requests run on detached tokio tasks. Failures are logged and dropped,
//! retrying is up to the cache layer behind the endpoint.

use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CacheInvalidator, InvalidationCall};

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "x-revalidate-secret";

/// Errors from the HTTP backend
#[derive(Debug, Error)]
pub enum RevalidateError {
    #[error("HTTP revalidator must be created inside a tokio runtime")]
    NoRuntime,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("revalidation of {call} rejected with status {status}")]
    Rejected {
        call: InvalidationCall,
        status: u16,
    },
}

/// Backend posting invalidations to a revalidation endpoint
pub struct HttpRevalidator {
    /// Endpoint URL
    endpoint: String,
    /// Optional shared secret
    secret: Option<String>,
    /// HTTP client
    client: reqwest::Client,
    /// Runtime the requests are spawned on
    runtime: Handle,
    /// Requests that may still be in flight
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpRevalidator {
    /// Create a backend bound to the current tokio runtime
    pub fn new(
        endpoint: impl Into<String>,
        secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RevalidateError> {
        let runtime = Handle::try_current().map_err(|_| RevalidateError::NoRuntime)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            secret,
            client,
            runtime,
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, call: &InvalidationCall) -> reqwest::RequestBuilder {
        let mut request = self.client.post(&self.endpoint).json(call);
        if let Some(ref secret) = self.secret {
            request = request.header(SECRET_HEADER, secret);
        }
        request
    }

    /// Wait for every request dispatched so far
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.pending_lock());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "revalidation task did not complete");
            }
        }
    }

    fn dispatch(&self, call: InvalidationCall) {
        let request = self.request(&call);

        let handle = self.runtime.spawn(async move {
            match send(request, call).await {
                Ok(call) => debug!(%call, "revalidation accepted"),
                Err(e) => warn!(error = %e, "revalidation failed"),
            }
        });

        let mut pending = self.pending_lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn pending_lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn send(
    request: reqwest::RequestBuilder,
    call: InvalidationCall,
) -> Result<InvalidationCall, RevalidateError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(RevalidateError::Rejected {
            call,
            status: status.as_u16(),
        });
    }

    Ok(call)
}

impl CacheInvalidator for HttpRevalidator {
    fn name(&self) -> &str {
        "http"
    }

    fn invalidate_path(&self, path: &str) {
        self.dispatch(InvalidationCall::path(path));
    }

    fn invalidate_tag(&self, tag: &str) {
        self.dispatch(InvalidationCall::tag(tag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_requires_runtime() {
        let result = HttpRevalidator::new("http://localhost/api/revalidate", None, Duration::from_secs(1));
        assert!(matches!(result, Err(RevalidateError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_request_carries_secret_and_body() {
        let revalidator = assert_ok!(HttpRevalidator::new(
            "http://localhost/api/revalidate",
            Some("s3cret".to_string()),
            Duration::from_secs(1),
        ));

        let request = revalidator
            .request(&InvalidationCall::path("/about"))
            .build()
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost/api/revalidate");
        assert_eq!(request.headers()[SECRET_HEADER], "s3cret");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"type":"path","value":"/about"}"#);
    }

    #[tokio::test]
    async fn test_request_without_secret() {
        let revalidator =
            HttpRevalidator::new("http://localhost/api/revalidate", None, Duration::from_secs(1)).unwrap();

        let request = revalidator
            .request(&InvalidationCall::tag("pages-sitemap"))
            .build()
            .unwrap();

        assert!(request.headers().get(SECRET_HEADER).is_none());
        assert_eq!(revalidator.name(), "http");
    }

    #[tokio::test]
    async fn test_flush_survives_panicked_task() {
        let revalidator =
            HttpRevalidator::new("http://127.0.0.1:9/api/revalidate", None, Duration::from_millis(200)).unwrap();

        revalidator
            .pending_lock()
            .push(tokio::spawn(async { panic!("request task panicked") }));
        revalidator.flush().await;

        assert!(revalidator.pending_lock().is_empty());
    }

    #[tokio::test]
    async fn test_flush_survives_unreachable_endpoint() {
        // Port 9 (discard) on loopback is closed on any sane test host
        let revalidator =
            HttpRevalidator::new("http://127.0.0.1:9/api/revalidate", None, Duration::from_millis(200)).unwrap();

        revalidator.invalidate_path("/about");
        revalidator.invalidate_tag("articles-sitemap");
        revalidator.flush().await;

        assert!(revalidator.pending_lock().is_empty());
    }
}
