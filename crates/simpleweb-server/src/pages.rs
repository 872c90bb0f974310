//! Application pages.
//!
//! Deliberately small stand-ins for the site content; the interesting part of
//! the server is how these are wrapped, not what they return.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
};

use crate::pipeline::AppRoute;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>simpleweb &middot; Home</title></head>
<body><h1>simpleweb</h1><p><a href="/page">Page 2</a></p></body>
</html>
"#;

const PAGE_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>simpleweb &middot; Page 2</title></head>
<body><h1>Page 2</h1><p><a href="/">Home</a></p></body>
</html>
"#;

const NOT_FOUND_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>simpleweb &middot; 404</title></head>
<body><h1>404</h1><p>Nothing here. <a href="/">Home</a></p></body>
</html>
"#;

/// Content routes, in registration order.
pub fn routes() -> Vec<AppRoute> {
    vec![
        AppRoute::new("/", get(index)),
        AppRoute::new("/page", get(page)),
        AppRoute::new("/hello/:name", get(hello)),
    ]
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn page() -> Html<&'static str> {
    Html(PAGE_HTML)
}

pub async fn hello(Path(name): Path<String>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("Hello, {name}!\n"),
    )
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}
