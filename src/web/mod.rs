//! Local web page and JSON API for the ticket board.
//!
//! The page is rendered on the server and driven by plain form posts, each
//! answered with a redirect back to `/`. Ball animations are CSS keyframes
//! generated from the same animation model the terminal renderer samples,
//! so both surfaces move the same way.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use crate::ball::{GLOW_ANIMATION, LAYER_OFFSET, POP_IN_ANIMATION, TAP_ANIMATION, WOBBLE_ANIMATION};
use crate::error::{LottoError, Result};
use crate::state::PreferenceStore;
use crate::theme::{Theme, ThemeController, ThemeView};
use crate::ticket::{CELEBRATION, Clock, SystemClock, TicketBuilder, TicketView};

const PAGE_CSS: &str = include_str!("page.css");

/// Board type served by the web surface.
pub type Board = TicketBuilder<StdRng, SystemClock>;

/// Shared server state.
pub struct AppState<S> {
    board: Arc<Mutex<Board>>,
    theme: Arc<Mutex<ThemeController<S>>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
            theme: Arc::clone(&self.theme),
        }
    }
}

impl<S: PreferenceStore> AppState<S> {
    pub fn new(board: Board, theme: ThemeController<S>) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            theme: Arc::new(Mutex::new(theme)),
        }
    }
}

/// Error returned from a handler.
#[derive(Debug)]
pub struct ApiError(LottoError);

impl From<LottoError> for ApiError {
    fn from(err: LottoError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_user_recoverable() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!(error = %self.0, %status, "Request failed");
        let body = serde_json::json!({
            "error": true,
            "message": self.0.to_string(),
            "suggestion": self.0.suggestion(),
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    theme: String,
}

/// Build the router with every page and API route.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: PreferenceStore + Send + 'static,
{
    Router::new()
        .route("/", get(index::<S>))
        .route("/generate", post(generate_form::<S>))
        .route("/shuffle", post(shuffle_form::<S>))
        .route("/theme", post(theme_form::<S>))
        .route("/api/ticket", get(get_ticket::<S>).post(post_ticket::<S>))
        .route("/api/shuffle", post(post_shuffle::<S>))
        .route("/api/theme", get(get_theme::<S>).post(post_theme::<S>))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serve until Ctrl+C. `on_ready` gets the URL once the socket is bound.
pub async fn serve<S, F>(addr: &str, state: AppState<S>, on_ready: F) -> Result<()>
where
    S: PreferenceStore + Send + 'static,
    F: FnOnce(&str),
{
    let failed = |reason: String| LottoError::WebServerFailed {
        addr: addr.to_string(),
        reason,
    };
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| failed(e.to_string()))?;
    let local = listener.local_addr().map_err(|e| failed(e.to_string()))?;
    let url = format!("http://{local}");
    info!(%url, "Web server listening");
    on_ready(&url);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| failed(e.to_string()))?;
    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// === Page handlers ===

async fn index<S>(State(state): State<AppState<S>>) -> Html<String>
where
    S: PreferenceStore + Send + 'static,
{
    let view = state.theme.lock().await.view();
    let board = state.board.lock().await;
    Html(render_page(&board, view))
}

async fn generate_form<S>(State(state): State<AppState<S>>) -> Redirect
where
    S: PreferenceStore + Send + 'static,
{
    state.board.lock().await.generate_ticket();
    Redirect::to("/")
}

async fn shuffle_form<S>(State(state): State<AppState<S>>) -> Redirect
where
    S: PreferenceStore + Send + 'static,
{
    state.board.lock().await.shuffle_delays();
    Redirect::to("/")
}

async fn theme_form<S>(State(state): State<AppState<S>>) -> std::result::Result<Redirect, ApiError>
where
    S: PreferenceStore + Send + 'static,
{
    state.theme.lock().await.toggle_theme()?;
    Ok(Redirect::to("/"))
}

// === API handlers ===

async fn get_ticket<S>(State(state): State<AppState<S>>) -> Json<TicketView>
where
    S: PreferenceStore + Send + 'static,
{
    Json(state.board.lock().await.view())
}

#[instrument(skip(state))]
async fn post_ticket<S>(State(state): State<AppState<S>>) -> Json<TicketView>
where
    S: PreferenceStore + Send + 'static,
{
    let mut board = state.board.lock().await;
    board.generate_ticket();
    Json(board.view())
}

#[instrument(skip(state))]
async fn post_shuffle<S>(State(state): State<AppState<S>>) -> Json<TicketView>
where
    S: PreferenceStore + Send + 'static,
{
    let mut board = state.board.lock().await;
    board.shuffle_delays();
    Json(board.view())
}

async fn get_theme<S>(State(state): State<AppState<S>>) -> Json<ThemeView>
where
    S: PreferenceStore + Send + 'static,
{
    Json(state.theme.lock().await.view())
}

/// Toggle the theme, or set it when the body names one.
#[instrument(skip(state, body), fields(body_len = body.len()))]
async fn post_theme<S>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> std::result::Result<Json<ThemeView>, ApiError>
where
    S: PreferenceStore + Send + 'static,
{
    let requested = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: ThemeRequest = serde_json::from_slice(&body)
            .map_err(|e| LottoError::InvalidTheme {
                value: e.to_string(),
            })?;
        Some(request.theme.parse::<Theme>()?)
    };

    let mut theme = state.theme.lock().await;
    match requested {
        Some(value) => theme.set_theme(value)?,
        None => {
            theme.toggle_theme()?;
        }
    }
    debug!(theme = %theme.theme(), "Theme changed over the API");
    Ok(Json(theme.view()))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// === Rendering ===

/// Stylesheet: static layout plus keyframes generated from the animation model.
pub fn stylesheet() -> String {
    let mut css = String::from(PAGE_CSS);
    for animation in [
        POP_IN_ANIMATION,
        WOBBLE_ANIMATION,
        GLOW_ANIMATION,
        TAP_ANIMATION,
        CELEBRATION,
    ] {
        css.push('\n');
        css.push_str(&animation.css_keyframes());
    }

    // The wobble sits on the wrapper so its transform composes with the entrance.
    let layered = format!("calc(var(--delay) + {}ms)", LAYER_OFFSET.as_millis());
    css.push_str(&format!(
        "\n.lotto-ball {{ animation: {}; }}\n",
        WOBBLE_ANIMATION.css_shorthand(&layered)
    ));
    css.push_str(&format!(
        ".lotto-ball .ball {{ animation: {}; }}\n",
        POP_IN_ANIMATION.css_shorthand("var(--delay)")
    ));
    css.push_str(&format!(
        ".lotto-ball::after {{ animation: {}; }}\n",
        GLOW_ANIMATION.css_shorthand(&layered)
    ));
    css.push_str(&format!(
        ".lotto-ball:active .ball {{ animation: {}; }}\n",
        TAP_ANIMATION.css_shorthand("0ms")
    ));
    css.push_str(&format!(
        ".card.celebrate {{ animation: {}; }}\n",
        CELEBRATION.css_shorthand("0ms")
    ));
    css
}

/// Full HTML page for the board.
pub fn render_page<R: Rng, C: Clock>(board: &TicketBuilder<R, C>, theme: ThemeView) -> String {
    let card_class = if board.celebration().plays() > 0 {
        "card celebrate"
    } else {
        "card"
    };
    let draw_time = board.draw_time().map_or_else(
        || r#"<p class="draw-time empty" id="draw-time">No ticket drawn yet</p>"#.to_string(),
        |time| format!(r#"<p class="draw-time" id="draw-time">Drawn at {time}</p>"#),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Lotto</title>
<style>
{css}
</style>
</head>
<body>
<main class="{card_class}">
<header>
<h1>Lotto Numbers</h1>
<form method="post" action="/theme"><button id="theme-toggle" class="secondary" type="submit">{toggle}</button></form>
</header>
{draw_time}
<section class="board">
{numbers}
<span class="plus">+</span>
{bonus}
</section>
<div class="actions">
<form method="post" action="/generate"><button type="submit">Generate</button></form>
<form method="post" action="/shuffle"><button class="secondary" type="submit">Shuffle</button></form>
</div>
</main>
</body>
</html>
"#,
        theme = theme.theme.as_str(),
        css = stylesheet(),
        toggle = theme.toggle_label,
        numbers = board.numbers().render_html(),
        bonus = board.bonus().render_html(),
    )
}
