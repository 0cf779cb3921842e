use reqwest::Url;
use serde::Serialize;

use crate::UpstreamFailure;

/// A GET endpoint below some base URL.
pub trait Route {
    type Params;
    /// Serialized into the query string by reqwest.
    type Query: Serialize + Send + Sync;

    /// Path segments after the base; each one is percent-encoded on its own.
    fn segments(params: &Self::Params) -> Vec<String>;

    fn query(params: &Self::Params) -> Self::Query;
}

/// Query for routes that take none.
#[derive(Serialize, Debug, Clone, Copy, Default)]
pub struct NoQuery {}

/// `base` with `segments` appended as encoded path segments.
pub fn endpoint<S: AsRef<str>>(base: &str, segments: &[S]) -> Result<Url, UpstreamFailure> {
    let mut url =
        Url::parse(base).map_err(|e| UpstreamFailure::Config(format!("base url {base}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| UpstreamFailure::Config(format!("base url {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_segments_to_base() {
        let url = endpoint("http://localhost:3002/", &["api", "echo", "osengine"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/echo/osengine");

        let url = endpoint("http://localhost:3002", &["api", "bare"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/bare");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let url = endpoint("https://visionalgorithms.example/stats/", &["api", "x"]).unwrap();
        assert_eq!(url.path(), "/stats/api/x");
    }

    #[test]
    fn segments_cannot_smuggle_query_or_fragment() {
        let url = endpoint("http://localhost:3002", &["r", "osengine?limit=1#", "top.json"]).unwrap();

        assert_eq!(url.path(), "/r/osengine%3Flimit=1%23/top.json");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = endpoint("http://localhost:3002", &["r", "../admin"]).unwrap();
        assert_eq!(url.path(), "/r/..%2Fadmin");
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(matches!(endpoint("not a url", &["x"]), Err(UpstreamFailure::Config(_))));
        assert!(matches!(endpoint("mailto:a@b", &["x"]), Err(UpstreamFailure::Config(_))));
    }
}
