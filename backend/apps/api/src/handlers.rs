//! Demo Handlers
//!
//! Small endpoints that sit behind the session middleware.

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, Method, Uri};

/// GET /
pub async fn hello(method: Method, uri: Uri, headers: HeaderMap) -> &'static str {
    tracing::info!(method = %method, uri = %uri, headers = ?headers.keys().collect::<Vec<_>>(), "Hello request");
    "Hello World\n"
}

/// POST / - writes the request body back unchanged
pub async fn echo(uri: Uri, body: Bytes) -> Bytes {
    tracing::info!(uri = %uri, bytes = body.len(), "Echoing request body");
    body
}

/// GET /{slug}
pub async fn slug(Path(slug): Path<String>) {
    tracing::info!(slug = %slug, "Got slug");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hello() {
        let body = hello(Method::GET, Uri::from_static("/"), HeaderMap::new()).await;
        assert_eq!(body, "Hello World\n");
    }

    #[tokio::test]
    async fn test_echo_returns_body() {
        let body = echo(Uri::from_static("/"), Bytes::from_static(b"ping")).await;
        assert_eq!(body, Bytes::from_static(b"ping"));
    }
}
