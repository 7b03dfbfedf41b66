// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{self, comments, complaints, reactions},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the comment, reaction and complaint routes under `/api/v1`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (forum core, configuration).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let comment_routes = Router::new()
        .route("/", get(comments::find_comments).post(comments::add_comment))
        .route(
            "/{comment_id}",
            get(comments::get_comment).delete(comments::delete_comment),
        )
        .route("/{comment_id}/likes", get(reactions::find_likes))
        .route("/{comment_id}/likes/count", get(reactions::count_likes))
        .route("/{comment_id}/dislikes", get(reactions::find_dislikes))
        .route("/{comment_id}/dislikes/count", get(reactions::count_dislikes))
        .route("/{comment_id}/complaints", get(complaints::find_complaints))
        .route(
            "/{comment_id}/complaints/count",
            get(complaints::count_complaints),
        );

    let article_routes = Router::new()
        .route("/{article_id}/comments", get(comments::find_comments_by_article))
        .route("/{article_id}/comments/count", get(comments::count_comments));

    let reaction_routes = Router::new()
        .route(
            "/likes",
            post(reactions::add_like).delete(reactions::delete_like),
        )
        .route(
            "/dislikes",
            post(reactions::add_dislike).delete(reactions::delete_dislike),
        );

    let complaint_routes = Router::new()
        .route("/", post(complaints::add_complaint))
        .route("/{complaint_id}", delete(complaints::delete_complaint));

    let api = Router::new()
        .nest("/comments", comment_routes)
        .nest("/articles", article_routes)
        .nest("/complaints", complaint_routes)
        .merge(reaction_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        // Global Middleware (outermost layer listed first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
