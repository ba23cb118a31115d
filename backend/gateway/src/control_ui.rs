//! Upload UI page.
//!
//! A single static page: masked API key field, image picker, progress text,
//! the Markdown result, and an error banner. It talks to `/api/analyze`.

use axum::{response::Html, routing::get, Router};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Returns a router that serves the UI page at `/`.
pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(|| async { Html(INDEX_HTML) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_masks_key_and_restricts_types() {
        assert!(INDEX_HTML.contains(r#"type="password""#));
        assert!(INDEX_HTML.contains(r#"accept=".png,.jpg,.jpeg,.gif,.webp""#));
        assert!(INDEX_HTML.contains("/api/analyze"));
    }
}
