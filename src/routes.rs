use std::{num::IntErrorKind, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, get_service},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::hot_reload::ws_handler;
use crate::posts::{find_post, PostListController};
use crate::state::{AppState, RouterState};
use crate::views::{self, render_with_layout, DEFAULT_POST_TITLE};

#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// `?page=` is 1-based; anything missing or unreadable means the first
    /// page. Numbers too large for `usize` land past the last page.
    fn page_index(&self) -> usize {
        let Some(raw) = self.page.as_deref().map(str::trim) else {
            return 0;
        };
        let number = match raw.parse::<usize>() {
            Ok(n) => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
            Err(_) => 0,
        };
        number.saturating_sub(1)
    }
}

pub async fn homepage(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let mut controller =
        PostListController::new(state.host.clone(), state.config.listing.page_size);
    controller.set_page(query.page_index());
    controller.load().await;
    debug!(
        page = controller.page_index(),
        total = controller.total_posts(),
        "rendering post list"
    );

    let templates = state.templates.read().await;
    let body = views::post_list(&templates, &controller, &state.config.listing);
    Html(render_with_layout(
        &templates,
        &templates.home.title,
        &body,
        state.config.is_development,
    ))
}

pub async fn render_post(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let post = find_post(&state.host, &filename).await;
    let templates = state.templates.read().await;

    match post {
        Some(post) => {
            let body = views::post_detail(&post, &state.config.listing);
            Html(render_with_layout(
                &templates,
                &post.title,
                &body,
                state.config.is_development,
            ))
            .into_response()
        }
        None => {
            debug!(%filename, "post not found");
            let body = views::not_found(&templates, &filename);
            let page = render_with_layout(
                &templates,
                DEFAULT_POST_TITLE,
                &body,
                state.config.is_development,
            );
            (StatusCode::NOT_FOUND, Html(page)).into_response()
        }
    }
}

pub async fn resume(State(state): State<Arc<AppState>>) -> Html<String> {
    let templates = state.templates.read().await;
    let body = views::resume(&templates, Local::now().date_naive());
    Html(render_with_layout(
        &templates,
        &templates.resume.name,
        &body,
        state.config.is_development,
    ))
}

pub async fn resume_vcard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let templates = state.templates.read().await;
    (
        [(header::CONTENT_TYPE, "text/vcard; charset=utf-8")],
        views::vcard(&templates.resume),
    )
}

pub fn router(router_state: RouterState) -> Router {
    let config = &router_state.app_state.config;
    let static_dir = config.content_dir.join("static");

    let mut app = Router::new()
        .route("/", get(homepage))
        .route("/blog/{filename}", get(render_post))
        .route("/resume", get(resume))
        .route("/resume.vcf", get(resume_vcard))
        .nest_service("/static", get_service(ServeDir::new(static_dir)));
    if config.is_development {
        app = app.route("/ws", get(ws_handler));
    }
    app.with_state(router_state)
}
