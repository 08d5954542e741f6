//! Blog server
//!
//! Serves the generated tree, proxies pagination requests to the content API
//! and renders posts that were published after the last build.

mod proxy;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::ContentClient;
use crate::error::BlogError;
use crate::generator::Generator;
use crate::pages::{detail, DetailView, Listing};
use crate::Blog;

pub use proxy::ProxyParams;

/// Server state
pub struct ServerState {
    blog: Blog,
    client: ContentClient,
    generator: Generator,
}

impl ServerState {
    pub fn new(blog: Blog, client: ContentClient) -> Result<Self> {
        let generator = Generator::new(&blog)?;
        Ok(Self {
            blog,
            client,
            generator,
        })
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = match &self {
            BlogError::MalformedCursor(_) => StatusCode::BAD_REQUEST,
            BlogError::NotFound(_) | BlogError::InvalidDocument { .. } => StatusCode::NOT_FOUND,
            BlogError::Http(_) | BlogError::Upstream { .. } | BlogError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let public_dir = state.blog.public_dir.clone();

    Router::new()
        .route("/", get(home))
        .route("/api/proxy", get(proxy::proxy))
        .route("/api/posts", get(more_posts))
        .route("/post/:slug", get(post_page))
        .route("/post/:slug/", get(post_page))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let client = blog.client()?;
    let state = Arc::new(ServerState::new(blog.clone(), client)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Home page: the generated file, or a fresh render when there is none
async fn home(State(state): State<Arc<ServerState>>) -> Response {
    let index = state.blog.public_dir.join("index.html");
    if let Ok(html) = tokio::fs::read_to_string(&index).await {
        return Html(html).into_response();
    }

    match state.generator.generate_home(&state.client).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Body of a "load more" response
#[derive(Debug, Serialize)]
struct MorePosts {
    html: String,
    next_page: Option<String>,
}

/// `GET /api/posts?nextpage=<base64>`: one "load more" step
async fn more_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ProxyParams>,
) -> Result<Json<MorePosts>, BlogError> {
    let mut listing = Listing::resume(params.cursor()?);
    listing
        .load_more(&state.client, state.generator.normalizer())
        .await?;

    let html = state
        .generator
        .renderer()
        .render_post_items(listing.posts())?;
    Ok(Json(MorePosts {
        html,
        next_page: listing.next_page().map(|c| c.encode()),
    }))
}

/// `GET /post/:slug`
///
/// Generated pages are served from disk. Anything else is fetched in a
/// background task; if it does not finish within `fallback_wait_ms` the
/// loading page is returned and the task keeps going, leaving the page on
/// disk for the refresh.
async fn post_page(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    if !detail::is_valid_slug(&slug) {
        return render_view(&state, &DetailView::NotFound { slug });
    }

    let path = state.generator.post_output_path(&slug);
    if let Ok(html) = tokio::fs::read_to_string(&path).await {
        return Html(html).into_response();
    }

    let task = {
        let state = state.clone();
        let slug = slug.clone();
        tokio::spawn(async move { state.generator.generate_post(&state.client, &slug).await })
    };

    let wait = Duration::from_millis(state.blog.config.fallback_wait_ms);
    match tokio::time::timeout(wait, task).await {
        Ok(Ok(Ok(view))) => render_view(&state, &view),
        Ok(Ok(Err(e))) => e.into_response(),
        Ok(Err(e)) => {
            tracing::error!("Fallback render for {} panicked: {}", slug, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(_) => {
            tracing::debug!("Post {} still loading", slug);
            render_view(&state, &DetailView::Loading)
        }
    }
}

fn render_view(state: &ServerState, view: &DetailView) -> Response {
    let status = if view.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    match state.generator.renderer().render_detail(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => e.into_response(),
    }
}
