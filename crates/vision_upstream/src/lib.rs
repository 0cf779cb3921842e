pub mod config;
pub mod envelope;
pub mod method;

use std::time::Duration;

use bon::bon;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub use config::ConfigError;
pub use envelope::NormalizeError;
pub use method::{NoQuery, Route, endpoint};
pub use reqwest::Url;

/// Reddit rejects or throttles anonymous clients without a descriptive agent.
pub const DEFAULT_USER_AGENT: &str = "VisionAlgorithms:v1.0.0 (by /u/osengine)";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3002";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("error decoding response body: {0}")]
    Decode(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl UpstreamFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            UpstreamFailure::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            UpstreamFailure::Decode(err.to_string())
        } else {
            UpstreamFailure::Transport(err.to_string())
        }
    }
}

/// Anything able to GET a URL with a serialized query and hand back its JSON
/// body.
///
/// Implementations never retry and never cache; every failure is reported as an
/// [`UpstreamFailure`].
pub trait FetchJson: Send + Sync {
    fn fetch_json<Q>(
        &self,
        url: Url,
        query: &Q,
    ) -> impl Future<Output = Result<Value, UpstreamFailure>> + Send
    where
        Q: Serialize + Sync + ?Sized;

    /// Fetch route `R` mounted under `base`.
    fn call<R: Route>(
        &self,
        base: &str,
        params: &R::Params,
    ) -> impl Future<Output = Result<Value, UpstreamFailure>> + Send {
        let url = endpoint(base, &R::segments(params));
        let query = R::query(params);
        async move { self.fetch_json(url?, &query).await }
    }
}

pub struct UpstreamClient {
    reqwest: Client,
}

#[bon]
impl UpstreamClient {
    #[builder]
    pub fn new(
        #[builder(into, default = DEFAULT_USER_AGENT.to_string())] user_agent: String,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
    ) -> Result<Self, UpstreamFailure> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent)
                .map_err(|e| UpstreamFailure::Config(format!("user agent: {e}")))?,
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let reqwest = ClientBuilder::new()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamFailure::Config(e.to_string()))?;

        Ok(Self { reqwest })
    }
}

impl FetchJson for UpstreamClient {
    async fn fetch_json<Q>(&self, url: Url, query: &Q) -> Result<Value, UpstreamFailure>
    where
        Q: Serialize + Sync + ?Sized,
    {
        debug!(%url, "GET upstream");

        let body = self
            .reqwest
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(body)
    }
}
