//! Read-only JSON API over the content store
//!
//! Renderers consume the published view of the blog through these routes.
//! Nothing here mutates the store.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::content::ContentStore;
use crate::persistence::PersistenceGateway;

/// Default number of entries returned by the popular route
const DEFAULT_POPULAR_LIMIT: usize = 5;

/// Shared handle to the store
pub type SharedStore<G> = Arc<RwLock<ContentStore<G>>>;

#[derive(Debug, Default, Deserialize)]
struct PostsQuery {
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PopularQuery {
    limit: Option<usize>,
}

/// Build the API router
pub fn router<G>(store: SharedStore<G>) -> Router
where
    G: PersistenceGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/api/posts", get(list_posts::<G>))
        .route("/api/posts/featured", get(featured_post::<G>))
        .route("/api/posts/popular", get(popular_posts::<G>))
        .route("/api/posts/page/:page", get(page_of_posts::<G>))
        .route("/api/post/:slug", get(post_by_slug::<G>))
        .route("/api/categories", get(categories::<G>))
        .route("/api/export", get(export::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Start the API server
pub async fn start<G>(store: ContentStore<G>, ip: &str, port: u16) -> Result<()>
where
    G: PersistenceGateway + Send + Sync + 'static,
{
    let app = router(Arc::new(RwLock::new(store)));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("API running at http://{}:{}/api/posts", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_posts<G: PersistenceGateway>(
    State(store): State<SharedStore<G>>,
    Query(params): Query<PostsQuery>,
) -> Response {
    let store = store.read().await;
    let posts = match (&params.q, &params.category) {
        (Some(q), _) => store.search_posts(q),
        (None, Some(category)) => store.posts_by_category(category),
        (None, None) => store.published_posts(),
    };
    Json(posts).into_response()
}

async fn featured_post<G: PersistenceGateway>(State(store): State<SharedStore<G>>) -> Response {
    let store = store.read().await;
    match store.featured_post() {
        Some(post) => Json(post).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn popular_posts<G: PersistenceGateway>(
    State(store): State<SharedStore<G>>,
    Query(params): Query<PopularQuery>,
) -> Response {
    let store = store.read().await;
    let limit = params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    Json(store.popular_posts(limit)).into_response()
}

async fn page_of_posts<G: PersistenceGateway>(
    State(store): State<SharedStore<G>>,
    Path(page): Path<usize>,
) -> Response {
    let store = store.read().await;
    let page_size = store.settings().posts_per_page;
    Json(store.paginate(page, page_size)).into_response()
}

async fn post_by_slug<G: PersistenceGateway>(
    State(store): State<SharedStore<G>>,
    Path(slug): Path<String>,
) -> Response {
    let store = store.read().await;
    match store.post_by_slug(&slug).filter(|p| p.is_published()) {
        Some(post) => Json(post).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn categories<G: PersistenceGateway>(State(store): State<SharedStore<G>>) -> Response {
    let store = store.read().await;
    Json(store.category_counts()).into_response()
}

async fn export<G: PersistenceGateway>(State(store): State<SharedStore<G>>) -> Response {
    let store = store.read().await;
    Json(store.export_document()).into_response()
}
