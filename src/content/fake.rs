//! In-memory content source for tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentSource, Cursor, Document, QueryResponse};
use crate::error::{BlogError, Result};

/// Serves a fixed chain of pages and a fixed set of documents
#[derive(Default)]
pub struct FakeSource {
    pub first: QueryResponse,
    pub pages: HashMap<String, QueryResponse>,
    pub documents: Vec<Document>,
    pub fetches: AtomicUsize,
}

impl FakeSource {
    /// Pages linked `CURSOR_1 -> CURSOR_2 -> ...`, one uid list per page
    pub fn paged(pages: &[&[&str]]) -> Self {
        let mut source = FakeSource::default();
        for (i, uids) in pages.iter().enumerate() {
            let next_page = if i + 1 < pages.len() {
                Some(cursor_url(i + 1))
            } else {
                None
            };
            let response = QueryResponse {
                page: i as u32 + 1,
                results: uids.iter().map(|uid| post_doc(uid, uid)).collect(),
                next_page,
                ..QueryResponse::default()
            };
            source.documents.extend(response.results.iter().cloned());
            if i == 0 {
                source.first = response;
            } else {
                source.pages.insert(cursor_url(i), response);
            }
        }
        source
    }

    pub fn with_document(mut self, doc: Document) -> Self {
        self.documents.push(doc);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// The cursor URL for the page after page `n`
pub fn cursor_url(n: usize) -> String {
    format!(
        "https://repo.cdn.prismic.io/api/v2/documents/search?ref=MASTER&page={}",
        n + 1
    )
}

/// A minimal valid post document
pub fn post_doc(uid: &str, title: &str) -> Document {
    serde_json::from_value(json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": [{"type": "heading1", "text": title, "spans": []}],
            "subtitle": "subtitle",
            "author": [{"type": "paragraph", "text": "Joseph Oliveira", "spans": []}],
            "banner": {"url": "https://images.prismic.io/banner.png"},
            "content": [{
                "heading": [{"type": "heading2", "text": "Intro", "spans": []}],
                "body": [{"type": "paragraph", "text": "Lorem ipsum dolor sit amet", "spans": []}]
            }]
        }
    }))
    .expect("valid post document")
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn query(&self, _document_type: &str, _page_size: usize) -> Result<QueryResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.first.clone())
    }

    async fn get_by_uid(&self, _document_type: &str, uid: &str) -> Result<Option<Document>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .documents
            .iter()
            .find(|d| d.uid.as_deref() == Some(uid))
            .cloned())
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<QueryResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(cursor.as_str())
            .cloned()
            .ok_or_else(|| BlogError::Upstream {
                status: 404,
                body: format!("no page for {}", cursor),
            })
    }
}

/// Serve `pages` as a content API on a random local port
///
/// Requires `access_token=secret` on every request, pins searches to the
/// `MASTER` ref, links pages through `next_page`, answers uid queries from
/// every page, and fails `/api/v2/broken` with a 500.
pub async fn spawn_api(pages: Vec<Vec<Document>>) -> std::net::SocketAddr {
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Json, Response};
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::Arc;

    struct Api {
        addr: SocketAddr,
        pages: Vec<Vec<Document>>,
    }

    type Params = Query<HashMap<String, String>>;

    fn authorized(params: &HashMap<String, String>) -> bool {
        params.get("access_token").map(String::as_str) == Some("secret")
    }

    fn unauthorized() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid access token"})),
        )
            .into_response()
    }

    async fn root(Query(params): Params) -> Response {
        if !authorized(&params) {
            return unauthorized();
        }
        Json(json!({"refs": [
            {"id": "preview", "ref": "PREVIEW", "isMasterRef": false},
            {"id": "master", "ref": "MASTER", "isMasterRef": true}
        ]}))
        .into_response()
    }

    async fn search(State(api): State<Arc<Api>>, Query(params): Params) -> Response {
        if !authorized(&params) || params.get("ref").map(String::as_str) != Some("MASTER") {
            return unauthorized();
        }
        let q = params.get("q").cloned().unwrap_or_default();

        if q.contains(".uid") {
            let found: Vec<&Document> = api
                .pages
                .iter()
                .flatten()
                .filter(|d| {
                    d.uid
                        .as_deref()
                        .map(|uid| q.contains(&format!("\"{}\"", uid)))
                        .unwrap_or(false)
                })
                .collect();
            return Json(json!({"page": 1, "results": found, "next_page": null})).into_response();
        }

        let page: usize = params
            .get("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
            .max(1);
        let results = api.pages.get(page - 1).cloned().unwrap_or_default();
        let next_page = (page < api.pages.len()).then(|| {
            format!(
                "http://{}/api/v2/documents/search?ref=MASTER&q={}&page={}",
                api.addr,
                "%5B%5Bat%28document.type%2C+%22posts%22%29%5D%5D",
                page + 1
            )
        });
        Json(json!({
            "page": page,
            "total_pages": api.pages.len(),
            "results": results,
            "next_page": next_page
        }))
        .into_response()
    }

    async fn broken() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake API");
    let addr = listener.local_addr().expect("fake API address");
    let app = Router::new()
        .route("/api/v2", get(root))
        .route("/api/v2/documents/search", get(search))
        .route("/api/v2/broken", get(broken))
        .with_state(Arc::new(Api { addr, pages }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Documents for `uids`, one page per slice
pub fn pages_of(pages: &[&[&str]]) -> Vec<Vec<Document>> {
    pages
        .iter()
        .map(|uids| uids.iter().map(|uid| post_doc(uid, uid)).collect())
        .collect()
}
