//! HTTP front-end.
//!
//! - `GET /` serves a search form
//! - `GET /feed?t=<term>` (or `/feed/`) serves the RSS feed for a term

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::app::{EksiError, Result};
use crate::domain::SearchTerm;
use crate::feed::RSS_CONTENT_TYPE;
use crate::pipeline::FeedPipeline;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>eksirss</title></head>
<body>
  <h1>eksirss</h1>
  <p>Ekşi Sözlük başlıklarını RSS olarak takip edin.</p>
  <form action="/feed/" method="get">
    <input type="text" name="t" placeholder="başlık">
    <button type="submit">RSS</button>
  </form>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    t: Option<String>,
}

pub fn router(pipeline: Arc<FeedPipeline>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/feed", get(feed))
        .route("/feed/", get(feed))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

pub async fn serve(addr: SocketAddr, pipeline: Arc<FeedPipeline>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn feed(
    State(pipeline): State<Arc<FeedPipeline>>,
    Query(query): Query<FeedQuery>,
) -> Response {
    let term = match SearchTerm::new(query.t.as_deref().unwrap_or("")) {
        Ok(term) => term,
        Err(e) => return e.into_response(),
    };

    info!("Feed requested: {}", term);

    match pipeline.feed(&term).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for EksiError {
    fn into_response(self) -> Response {
        let status = match &self {
            EksiError::InvalidTerm(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
