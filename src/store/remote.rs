//! HTTP client for the hosted dataset service

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    documents::{DatasetSelector, ExampleRecord},
    error::{LodestarError, Result},
};

use super::{ExampleStore, ListOptions};

const DEFAULT_BASE_URL: &str = "https://api.lodestar.dev";

/// Records fetched per request when paging through a dataset
const PAGE_SIZE: usize = 100;

/// Configuration for [`RemoteExampleStore`]
#[derive(Debug, Clone, Default)]
pub struct RemoteStoreConfig {
    /// API key; falls back to the `LODESTAR_API_KEY` environment variable
    pub api_key: Option<String>,

    /// Service base URL override
    pub base_url: Option<String>,
}

/// Dataset service client backed by `reqwest`
///
/// Timeouts, pooling and retry policy live in the HTTP client; this
/// adapter performs no local retries and no caching.
pub struct RemoteExampleStore {
    client: Client,
    base_url: String,
}

impl RemoteExampleStore {
    /// Create a new client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Configuration`] when no API key is
    /// available or the key is not a valid header value.
    pub fn new(config: RemoteStoreConfig) -> Result<Self> {
        let api_key = match config.api_key {
            Some(key) => key,
            None => std::env::var("LODESTAR_API_KEY").map_err(|_| {
                LodestarError::Configuration(
                    "no API key: set RemoteStoreConfig.api_key or LODESTAR_API_KEY".to_string(),
                )
            })?,
        };

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    "x-api-key",
                    header::HeaderValue::from_str(&api_key).map_err(|_| {
                        LodestarError::Configuration("Invalid API key format".to_string())
                    })?,
                );
                headers
            })
            .build()?;

        Ok(Self { client, base_url })
    }

    async fn error_from_response(
        context: &str,
        status: StatusCode,
        response: reqwest::Response,
    ) -> LodestarError {
        let body = response.text().await.unwrap_or_default();
        LodestarError::transport(context, format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl ExampleStore for RemoteExampleStore {
    async fn resolve_dataset(&self, selector: &DatasetSelector) -> Result<Uuid> {
        if let Some(id) = selector.id {
            return Ok(id);
        }

        // validate() guarantees a name is present when no id is
        let name = selector.name.as_deref().ok_or_else(|| {
            LodestarError::Configuration("dataset selector must set a name or an id".to_string())
        })?;

        tracing::debug!(dataset = name, "resolving dataset by name");

        let response = self
            .client
            .get(format!("{}/api/v1/datasets", self.base_url))
            .query(&[("name", name)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response("resolve_dataset", status, response).await);
        }

        let datasets: Vec<DatasetInfo> = response.json().await?;
        datasets
            .first()
            .map(|d| d.id)
            .ok_or_else(|| LodestarError::NotFound(format!("dataset '{name}'")))
    }

    async fn list_examples(
        &self,
        dataset_id: Uuid,
        opts: ListOptions,
    ) -> Result<Vec<ExampleRecord>> {
        let mut records = Vec::new();
        let mut offset = 0usize;

        loop {
            let page_size = match opts.limit {
                Some(limit) => PAGE_SIZE.min(limit - records.len()),
                None => PAGE_SIZE,
            };
            if page_size == 0 {
                break;
            }

            tracing::debug!(%dataset_id, offset, page_size, "fetching example page");

            let response = self
                .client
                .get(format!("{}/api/v1/examples", self.base_url))
                .query(&[
                    ("dataset", dataset_id.to_string()),
                    ("limit", page_size.to_string()),
                    ("offset", offset.to_string()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Self::error_from_response("list_examples", status, response).await);
            }

            let page: Vec<ExampleRecord> = response.json().await?;
            let fetched = page.len();
            records.extend(page);

            if fetched < page_size {
                break;
            }
            offset += fetched;
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct DatasetInfo {
    id: Uuid,
    #[allow(dead_code)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(base_url: String) -> RemoteExampleStore {
        RemoteExampleStore::new(RemoteStoreConfig {
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url),
        })
        .unwrap()
    }

    fn example_json(dataset_id: Uuid, name: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "created_at": Utc::now(),
            "modified_at": Utc::now(),
            "name": name,
            "dataset_id": dataset_id,
            "metadata": {},
            "inputs": { "question": "q" },
            "outputs": { "answer": "a" },
        })
    }

    #[tokio::test]
    async fn test_resolve_dataset_by_name() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path("/api/v1/datasets"))
            .and(query_param("name", "qa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": id, "name": "qa" }
            ])))
            .mount(&server)
            .await;

        let store = store(server.uri());
        let resolved = store
            .resolve_dataset(&DatasetSelector::by_name("qa"))
            .await
            .unwrap();
        assert_eq!(resolved, id);
    }

    #[tokio::test]
    async fn test_resolve_dataset_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/datasets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = store(server.uri());
        let err = store
            .resolve_dataset(&DatasetSelector::by_name("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, LodestarError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_by_id_skips_network() {
        // No mock server at all: an id selector must not issue a request
        let store = store("http://127.0.0.1:1".to_string());
        let id = Uuid::new_v4();
        let resolved = store
            .resolve_dataset(&DatasetSelector::by_id(id))
            .await
            .unwrap();
        assert_eq!(resolved, id);
    }

    #[tokio::test]
    async fn test_list_examples_honors_limit() {
        let server = MockServer::start().await;
        let dataset_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path("/api/v1/examples"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                example_json(dataset_id, "e1"),
                example_json(dataset_id, "e2"),
                example_json(dataset_id, "e3"),
            ])))
            .mount(&server)
            .await;

        let store = store(server.uri());
        let records = store
            .list_examples(dataset_id, ListOptions { limit: Some(3) })
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "e1");
    }

    #[tokio::test]
    async fn test_service_error_becomes_transport() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/examples"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let store = store(server.uri());
        let err = store
            .list_examples(Uuid::new_v4(), ListOptions::default())
            .await
            .unwrap_err();
        match err {
            LodestarError::Transport { context, message } => {
                assert_eq!(context, "list_examples");
                assert!(message.contains("500"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
