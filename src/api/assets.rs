use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets"]
struct Asset;

fn serve(path: &str) -> Response {
    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// GET / and GET /login
pub async fn login_page() -> impl IntoResponse {
    serve("login.html")
}

/// GET /logo.png
pub async fn logo() -> impl IntoResponse {
    serve("logo.png")
}

/// GET /favicon.ico
pub async fn favicon() -> impl IntoResponse {
    serve("favicon.ico")
}
