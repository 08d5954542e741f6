//! Content API client
//!
//! Talks to a Prismic-style REST API: the API root lists refs, and
//! `documents/search` answers predicate queries one page at a time.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::cursor::{strip_access_token, Cursor};
use super::document::{Document, QueryResponse};
use crate::config::SiteConfig;
use crate::error::{BlogError, Result};

/// Anything that can answer document queries
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of documents of the given type
    async fn query(&self, document_type: &str, page_size: usize) -> Result<QueryResponse>;

    /// The document with the given uid, if any
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>>;

    /// The page a cursor points at
    async fn fetch_page(&self, cursor: &Cursor) -> Result<QueryResponse>;
}

/// HTTP client for the content API
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master: bool,
}

impl ContentClient {
    /// Create a client for the API rooted at `endpoint`
    pub fn new(endpoint: &str, access_token: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BlogError::Config(format!("invalid api_endpoint {}: {}", endpoint, e)))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token,
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.api_endpoint, config.access_token())
    }

    /// Set the access token, if one is configured, replacing any already present
    pub fn authorize(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            strip_access_token(&mut url);
            url.query_pairs_mut().append_pair("access_token", token);
        }
        url
    }

    /// Send the request a cursor describes and hand back the raw response
    ///
    /// The status is not checked; callers that relay the response verbatim
    /// need the upstream status untouched.
    pub async fn forward(&self, cursor: &Cursor) -> Result<Response> {
        let url = self.authorize(cursor.to_url_for(&self.endpoint)?);
        tracing::debug!("Forwarding cursor to {}", url.path());
        Ok(self.http.get(url).send().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.http.get(url).send().await?;
        decode_json(response).await
    }

    /// Current master ref; every search is pinned to it
    async fn master_ref(&self) -> Result<String> {
        let root: ApiRoot = self.get_json(self.authorize(self.endpoint.clone())).await?;
        root.refs
            .into_iter()
            .find(|r| r.is_master)
            .map(|r| r.reference)
            .ok_or_else(|| BlogError::Upstream {
                status: 200,
                body: "API root has no master ref".to_string(),
            })
    }

    async fn search(&self, predicate: &str, page_size: usize) -> Result<QueryResponse> {
        let master = self.master_ref().await?;
        let base = format!(
            "{}/documents/search",
            self.endpoint.as_str().trim_end_matches('/')
        );
        let mut url = Url::parse(&base)
            .map_err(|e| BlogError::Config(format!("invalid search URL {}: {}", base, e)))?;
        url.query_pairs_mut()
            .append_pair("ref", &master)
            .append_pair("q", predicate)
            .append_pair("pageSize", &page_size.to_string());

        tracing::debug!("Querying content API: {}", predicate);
        self.get_json(self.authorize(url)).await
    }
}

/// Decode a successful response, turning any other status into an error
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BlogError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn query(&self, document_type: &str, page_size: usize) -> Result<QueryResponse> {
        let predicate = format!(r#"[[at(document.type, "{}")]]"#, document_type);
        self.search(&predicate, page_size).await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>> {
        let predicate = format!(r#"[[at(my.{}.uid, "{}")]]"#, document_type, uid);
        let response = self.search(&predicate, 1).await?;
        Ok(response.results.into_iter().next())
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<QueryResponse> {
        let response = self.forward(cursor).await?;
        decode_json(response).await
    }
}
