//! Same-origin proxy to the content API
//!
//! Browsers only ever see base64 cursors. The access token is appended here,
//! on the server, and the upstream answer is relayed as-is.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use super::ServerState;
use crate::content::Cursor;
use crate::error::{BlogError, Result};

/// Query string shared by `/api/proxy` and `/api/posts`
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub nextpage: Option<String>,
}

impl ProxyParams {
    /// The cursor carried by `?nextpage=`
    pub fn cursor(&self) -> Result<Cursor> {
        match self.nextpage.as_deref() {
            Some(encoded) => Cursor::decode(encoded),
            None => Err(BlogError::MalformedCursor(
                "missing nextpage parameter".to_string(),
            )),
        }
    }
}

/// `GET /api/proxy?nextpage=<base64>`
pub async fn proxy(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ProxyParams>,
) -> Response {
    let cursor = match params.cursor() {
        Ok(cursor) => cursor,
        Err(e) => return e.into_response(),
    };

    match state.client.forward(&cursor).await {
        Ok(upstream) => relay(upstream).await,
        Err(e) => e.into_response(),
    }
}

/// Copy status, content type and body from the upstream response
async fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    match upstream.bytes().await {
        Ok(body) => {
            let mut response = (status, body).into_response();
            if let Some(content_type) = content_type {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            response
        }
        Err(e) => BlogError::from(e).into_response(),
    }
}
