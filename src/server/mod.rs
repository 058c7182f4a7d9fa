//! Serving boundary: the markdown-by-slug API plus static files
//!
//! `GET /api/blog/{slug}[.md]` returns the raw post source as markdown.
//! Everything else falls back to static file serving from the public
//! directory (where the generated feeds live).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tower_http::services::ServeDir;

use crate::content::PostStore;
use crate::error::Error;
use crate::Site;

lazy_static! {
    /// Slugs are simple identifiers; anything else (path separators,
    /// traversal sequences, dots) is rejected before touching the store.
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();
}

struct ServerState {
    store: PostStore,
}

/// Start the server.
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        store: PostStore::new(&site.content_dir),
    });

    let app = Router::new()
        .route("/api/blog/:slug", get(markdown_handler))
        .fallback_service(
            ServeDir::new(&site.public_dir).append_index_html_on_directories(true),
        )
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn markdown_handler(
    AxumPath(slug): AxumPath<String>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    match fetch_markdown(&state.store, &slug) {
        Ok((slug, body)) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/markdown; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}.md\"", slug),
                ),
            ],
            body,
        )
            .into_response(),
        Err(Error::InvalidSlug(_)) => {
            (StatusCode::BAD_REQUEST, "Invalid slug").into_response()
        }
        Err(Error::PostNotFound(_)) => {
            (StatusCode::NOT_FOUND, "Post not found").into_response()
        }
        Err(e) => {
            // Never leak file-system paths to the client.
            tracing::error!("Failed to serve markdown: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Validate the slug and read the raw post source.
fn fetch_markdown(store: &PostStore, raw_slug: &str) -> crate::error::Result<(String, String)> {
    let slug = clean_slug(raw_slug)?;
    let body = store.read_raw(slug)?;
    Ok((slug.to_string(), body))
}

/// Strip one optional `.md` suffix and enforce the identifier shape.
fn clean_slug(raw: &str) -> crate::error::Result<&str> {
    let slug = raw.strip_suffix(".md").unwrap_or(raw);
    if !SLUG_RE.is_match(slug) {
        return Err(Error::InvalidSlug(raw.to_string()));
    }
    Ok(slug)
}
