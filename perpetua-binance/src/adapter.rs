#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use perpetua_core::{BinanceConfig, PerpetuaError};

/// Status code and decoded body of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// HTTP status returned by the venue.
    pub status_code: u16,
    /// Decoded JSON body, `None` when the body was empty or not JSON.
    pub data: Option<Value>,
}

/// HTTP abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait BinanceHttp: Send + Sync {
    /// Issue a GET for `path` with `params` appended in order.
    ///
    /// # Errors
    /// Returns `UpstreamTransport` when no response could be obtained.
    async fn get(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<UpstreamResponse, PerpetuaError>;
}

/// Real adapter backed by a single `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base_url: Url,
}

impl RealAdapter {
    /// Build a client with the configured per-call timeout.
    ///
    /// # Errors
    /// Returns `Validation` for an unparsable base URL and `UpstreamTransport`
    /// if the HTTP client cannot be constructed.
    pub fn new(config: &BinanceConfig) -> Result<Self, PerpetuaError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            PerpetuaError::validation(format!("invalid base url {}: {e}", config.base_url))
        })?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PerpetuaError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base_url })
    }

    fn url_for(&self, path: &str, params: &[(&'static str, String)]) -> Result<Url, PerpetuaError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PerpetuaError::validation(format!("invalid endpoint path {path}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

fn map_reqwest_err(e: &reqwest::Error, url: &Url) -> PerpetuaError {
    if e.is_timeout() {
        PerpetuaError::transport(format!("request to {} timed out", url.path()))
    } else if e.is_connect() {
        PerpetuaError::transport(format!("could not connect to {}: {e}", url.path()))
    } else {
        PerpetuaError::transport(format!("request to {} failed: {e}", url.path()))
    }
}

#[async_trait]
impl BinanceHttp for RealAdapter {
    async fn get(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<UpstreamResponse, PerpetuaError> {
        let url = self.url_for(path, params)?;
        let resp = self
            .http
            .get(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| map_reqwest_err(&e, &url))?;
        let status_code = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| map_reqwest_err(&e, &url))?;
        let data = serde_json::from_str::<Value>(&body).ok();
        Ok(UpstreamResponse { status_code, data })
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn BinanceHttp {
    /// Build a `BinanceHttp` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn BinanceHttp>
    where
        F: Send
            + Sync
            + 'static
            + Fn(String, Vec<(&'static str, String)>) -> Result<UpstreamResponse, PerpetuaError>,
    {
        struct FnHttp<F>(F);
        #[async_trait]
        impl<F> BinanceHttp for FnHttp<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(String, Vec<(&'static str, String)>) -> Result<UpstreamResponse, PerpetuaError>,
        {
            async fn get(
                &self,
                path: &str,
                params: &[(&'static str, String)],
            ) -> Result<UpstreamResponse, PerpetuaError> {
                (self.0)(path.to_string(), params.to_vec())
            }
        }
        Arc::new(FnHttp(f))
    }
}
