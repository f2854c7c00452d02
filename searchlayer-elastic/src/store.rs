//! Elasticsearch-backed implementation of the search backend.
//!
//! This module wires the backend trait onto the `opensearch` client, which
//! speaks the Elasticsearch-compatible HTTP API. Request bodies arrive
//! fully rendered from the client layer; this adapter only sends them and
//! classifies the outcome.
//!
//! Failures fall into three buckets: the request never completed
//! (`Transport`), the cluster answered with a non-success status
//! (`Backend`, carrying the raw body), or a success payload could not be
//! decoded (`MalformedResponse`). Nothing is retried.

use async_trait::async_trait;
use opensearch::{
    DeleteParts, ExistsParts, GetParts, GetSourceParts, IndexParts, OpenSearch, SearchParts,
    UpdateParts,
    auth::Credentials,
    http::{
        StatusCode, Url,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use searchlayer_core::{
    backend::{SearchBackend, SearchBackendBuilder},
    document::{Ack, GetResponse},
    error::{SearchResult, SearchStoreError},
};

use crate::config::ElasticConfig;

/// Search backend over an Elasticsearch-compatible HTTP API.
///
/// The store is cheap to clone; clones share the underlying transport.
#[derive(Debug, Clone)]
pub struct ElasticStore {
    client: OpenSearch,
    config: ElasticConfig,
}

impl ElasticStore {
    /// Builds the transport and client without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `Initialization` when the URL does not parse or the
    /// transport cannot be constructed.
    pub fn new(config: ElasticConfig) -> SearchResult<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| SearchStoreError::Initialization(format!("invalid cluster url: {e}")))?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        #[cfg(any(feature = "rustls", feature = "native-tls"))]
        if !config.verify_certs {
            builder = builder.cert_validation(opensearch::cert::CertificateValidation::None);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchStoreError::Initialization(e.to_string()))?;

        Ok(Self {
            client: OpenSearch::new(transport),
            config,
        })
    }

    /// Builds the client and verifies the cluster is reachable.
    ///
    /// Performs the info handshake and logs the cluster name and version.
    ///
    /// # Errors
    ///
    /// Returns `Initialization` when the cluster cannot be reached or its
    /// info response cannot be read.
    pub async fn connect(config: ElasticConfig) -> SearchResult<Self> {
        let store = Self::new(config)?;

        let response = store
            .client
            .info()
            .send()
            .await
            .map_err(|e| {
                SearchStoreError::Initialization(format!("cannot reach cluster: {e}"))
            })?;
        let info: Value = response.json().await.map_err(|e| {
            SearchStoreError::Initialization(format!("cannot read cluster info: {e}"))
        })?;

        log::info!(
            "connected to {} ({})",
            info["cluster_name"].as_str().unwrap_or("unknown cluster"),
            info["version"]["number"].as_str().unwrap_or("unknown version"),
        );

        Ok(store)
    }

    /// Returns the underlying client for operations this layer does not
    /// cover.
    pub fn client(&self) -> &OpenSearch {
        &self.client
    }

    /// Returns the configuration this store was built from.
    pub fn config(&self) -> &ElasticConfig {
        &self.config
    }
}

fn transport_error(error: opensearch::Error) -> SearchStoreError {
    SearchStoreError::Transport(error.to_string())
}

/// Returns the raw body of a successful response, or the backend error a
/// non-success status maps to.
async fn success_bytes(response: Response) -> SearchResult<Vec<u8>> {
    let status = response.status_code();

    if !status.is_success() {
        let body = response.text().await.map_err(transport_error)?;
        return Err(SearchStoreError::Backend {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(bytes.to_vec())
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> SearchResult<T> {
    serde_json::from_slice(bytes).map_err(|e| SearchStoreError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl SearchBackend for ElasticStore {
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        log::debug!("indexing {}/{}", index, id);

        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        decode(&success_bytes(response).await?)
    }

    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        log::debug!("updating {}/{}", index, id);

        let response = self
            .client
            .update(UpdateParts::IndexId(index, id))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        decode(&success_bytes(response).await?)
    }

    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack> {
        log::debug!("deleting {}/{}", index, id);

        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(transport_error)?;

        decode(&success_bytes(response).await?)
    }

    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(transport_error)?;

        decode(&success_bytes(response).await?)
    }

    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>> {
        let response = self
            .client
            .get_source(GetSourceParts::IndexId(index, id))
            .send()
            .await
            .map_err(transport_error)?;

        success_bytes(response).await
    }

    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool> {
        let response = self
            .client
            .exists(ExistsParts::IndexId(index, id))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.map_err(transport_error)?;
        Err(SearchStoreError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>> {
        log::debug!("searching {} with size {}", index, size);

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .size(size)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        success_bytes(response).await
    }
}

/// Builder that connects an [`ElasticStore`] from its configuration.
pub struct ElasticStoreBuilder {
    config: ElasticConfig,
}

impl ElasticStoreBuilder {
    /// Creates a builder for the given configuration.
    pub fn new(config: ElasticConfig) -> Self {
        Self { config }
    }

    /// Creates a builder from the environment.
    pub fn from_env() -> Self {
        Self::new(ElasticConfig::from_env())
    }
}

#[async_trait]
impl SearchBackendBuilder for ElasticStoreBuilder {
    type Backend = ElasticStore;

    /// Connects to the cluster and returns a ready store.
    async fn build(self) -> SearchResult<Self::Backend> {
        ElasticStore::connect(self.config).await
    }
}
