use crate::server::AppState;
use crate::sitemap::SitemapFormat;
use crate::url::parse_base_url;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
pub struct SitemapQuery {
    url: Option<String>,
    format: Option<String>,
}

pub async fn sitemap(State(state): State<AppState>, Query(query): Query<SitemapQuery>) -> Response {
    let raw_url = query.url.unwrap_or_default();
    if raw_url.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "provided url is empty").into_response();
    }

    let base_url = match parse_base_url(&raw_url) {
        Ok(url) => url,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("provided url is invalid: {}", e),
            )
                .into_response()
        }
    };

    let format = match query.format.as_deref() {
        None | Some("") => state.default_format,
        Some(token) => match token.parse::<SitemapFormat>() {
            Ok(format) => format,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
    };

    // The crawl stops if the client goes away and this future is dropped
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state.service.generate_sitemap(&cancel, base_url, format).await {
        Ok(body) => ([(header::CONTENT_TYPE, format.content_type())], body).into_response(),
        Err(e) => {
            tracing::error!("Generating sitemap for {} failed: {}", raw_url, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
