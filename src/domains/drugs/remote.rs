//! REST client for a remote drug data backend.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET drugs/search?q={query}` -> `[DrugRecord]`
//! - `GET drugs/{slug}` -> `DrugRecord` (404 when unknown)
//! - `GET drugs/condition/{condition}?page=&limit=` -> `Page`
//! - `GET drugs/{slug}/related` -> `[DrugRecord]` (404 when unknown)

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::model::{DrugRecord, Page, PageRequest};
use super::store::{DrugStore, StoreError};
use crate::core::{Error, Result};

/// A [`DrugStore`] that queries a remote HTTP API.
#[derive(Debug, Clone)]
pub struct RemoteDrugStore {
    client: Client,
    base_url: Url,
}

impl RemoteDrugStore {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid drug API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Drug API URL cannot be used as a base: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| StoreError::backend("Drug API URL cannot be a base"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// GET a JSON document. A 404 maps to `NotFound(slug)` when a slug is
    /// given, otherwise to a backend failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        slug: Option<&str>,
    ) -> std::result::Result<T, StoreError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::backend(format!("Request to {url} failed: {e}")))?;

        match (response.status(), slug) {
            (StatusCode::NOT_FOUND, Some(slug)) => Err(StoreError::not_found(slug)),
            (status, _) if !status.is_success() => {
                warn!("Drug API returned {} for {}", status, url);
                Err(StoreError::backend(format!("{url} returned {status}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| StoreError::Decode(e.to_string())),
        }
    }
}

#[async_trait]
impl DrugStore for RemoteDrugStore {
    #[instrument(skip(self))]
    async fn search_by_text(&self, query: &str) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        let mut url = self.endpoint(&["drugs", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.get_json(url, None).await
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> std::result::Result<DrugRecord, StoreError> {
        let url = self.endpoint(&["drugs", slug])?;
        self.get_json(url, Some(slug)).await
    }

    #[instrument(skip(self))]
    async fn get_by_condition(
        &self,
        condition: &str,
        page: PageRequest,
    ) -> std::result::Result<Page, StoreError> {
        let mut url = self.endpoint(&["drugs", "condition", condition])?;
        url.query_pairs_mut()
            .append_pair("page", &page.page.to_string())
            .append_pair("limit", &page.limit.to_string());
        self.get_json(url, None).await
    }

    #[instrument(skip(self))]
    async fn compare_by_slugs(
        &self,
        slugs: &[String],
    ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        let lookups = join_all(slugs.iter().map(|slug| self.get_by_slug(slug))).await;

        let mut drugs = Vec::with_capacity(lookups.len());
        for lookup in lookups {
            match lookup {
                Ok(drug) => drugs.push(drug),
                Err(StoreError::NotFound(slug)) => debug!("Skipping unknown slug: {}", slug),
                Err(e) => return Err(e),
            }
        }
        Ok(drugs)
    }

    #[instrument(skip(self))]
    async fn get_related_by_slug(
        &self,
        slug: &str,
    ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        let url = self.endpoint(&["drugs", slug, "related"])?;
        self.get_json(url, Some(slug)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio_test::assert_err;

    /// Canned backend answers keyed by request path.
    fn route(path: &str) -> (u16, String) {
        let record = |slug: &str, name: &str| {
            serde_json::json!({ "slug": slug, "drugName": name }).to_string()
        };
        match path {
            "/drugs/metformin" => (200, record("metformin", "Metformin")),
            "/drugs/aspirin-81" => (200, record("aspirin-81", "Aspirin")),
            "/drugs/garbled" => (200, "{\"slug\": ".to_string()),
            "/drugs/broken" => (500, r#"{"error":"boom"}"#.to_string()),
            _ => (404, r#"{"error":"not found"}"#.to_string()),
        }
    }

    async fn respond(mut socket: TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = String::from_utf8_lossy(&request);
        let target = head.split_whitespace().nth(1).unwrap_or("/");
        let path = target.split('?').next().unwrap_or(target);
        let (status, body) = route(path);
        let response = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    /// Serve `route` on an ephemeral local port and return a store pointed at it.
    async fn backend() -> RemoteDrugStore {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(respond(socket));
            }
        });
        store(&format!("http://{addr}"))
    }

    fn store(base: &str) -> RemoteDrugStore {
        RemoteDrugStore::new(base, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let store = store("http://localhost:3000/api");
        let url = store.endpoint(&["drugs", "aspirin-81"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/drugs/aspirin-81");
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let store = store("http://localhost:3000/api/");
        let url = store.endpoint(&["drugs", "x", "related"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/drugs/x/related");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let store = store("http://localhost:3000");
        let url = store
            .endpoint(&["drugs", "condition", "high blood/pressure"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/drugs/condition/high%20blood%2Fpressure"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert_err!(RemoteDrugStore::new("not a url", Duration::from_secs(1)));
        assert_err!(RemoteDrugStore::new("mailto:someone@example.com", Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_backend_error() {
        // Port 1 is reserved and refuses connections on test machines.
        let store = store("http://127.0.0.1:1");
        let err = store.get_by_slug("aspirin-81").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_get_by_slug_found() {
        let store = backend().await;
        let drug = store.get_by_slug("metformin").await.unwrap();
        assert_eq!(drug.drug_name, "Metformin");
    }

    #[tokio::test]
    async fn test_404_with_slug_is_not_found() {
        let store = backend().await;
        let err = store.get_by_slug("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref s) if s == "ghost"));

        let err = store.get_related_by_slug("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_404_without_slug_is_backend_error() {
        let store = backend().await;
        let err = store
            .get_by_condition("gout", PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_backend_error() {
        let store = backend().await;
        let err = store.get_by_slug("broken").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_bad_body_is_decode_error() {
        let store = backend().await;
        let err = store.get_by_slug("garbled").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_compare_skips_unknown_and_keeps_order() {
        let store = backend().await;
        let slugs = vec![
            "aspirin-81".to_string(),
            "ghost".to_string(),
            "metformin".to_string(),
        ];
        let drugs = store.compare_by_slugs(&slugs).await.unwrap();
        let resolved: Vec<_> = drugs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(resolved, vec!["aspirin-81", "metformin"]);
    }

    #[tokio::test]
    async fn test_compare_fails_on_backend_error() {
        let store = backend().await;
        let slugs = vec!["metformin".to_string(), "broken".to_string()];
        let err = store.compare_by_slugs(&slugs).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
