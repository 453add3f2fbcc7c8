//! HTTP surface for the collector.
//!
//! `GET /` serves a small landing page and `GET /metrics` runs one scrape
//! and returns the exposition text. Requests serialize on the scraper, since
//! a shell channel cannot interleave commands from two callers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use log::{error, info};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::scraper::Scraper;
use crate::transport::Connector;

/// Content type of the exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const INDEX: &str = r#"<html>
<head><title>Zyxel Prometheus</title></head>
<body>
<h1>Zyxel Prometheus</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

/// Scraper shared between request handlers.
pub type SharedScraper<C> = Arc<Mutex<Scraper<C>>>;

/// Build the application router.
pub fn router<C>(scraper: SharedScraper<C>) -> Router
where
    C: Connector + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics::<C>))
        .with_state(scraper)
}

/// Serve on an already bound listener until the process ends.
pub async fn serve<C>(listener: TcpListener, scraper: Scraper<C>) -> std::io::Result<()>
where
    C: Connector + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{}", addr);
    }
    axum::serve(listener, router(Arc::new(Mutex::new(scraper)))).await
}

/// Bind `addr` and serve.
pub async fn bind_and_serve<C>(addr: SocketAddr, scraper: Scraper<C>) -> std::io::Result<()>
where
    C: Connector + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    serve(listener, scraper).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX)
}

async fn metrics<C>(State(scraper): State<SharedScraper<C>>) -> Response
where
    C: Connector + 'static,
{
    let mut scraper = scraper.lock().await;
    match scraper.scrape_and_render().await {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("scrape failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("scrape failed: {}\n", e),
            )
                .into_response()
        }
    }
}
