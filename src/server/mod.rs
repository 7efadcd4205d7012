//! In-memory stand-in for the research API, used for frontend development
//! and the native integration tests.

pub mod errors;
pub mod repository;
pub mod routes;
pub mod service;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::paths;
use crate::server::repository::{GroupRepository, PaperRepository};
use crate::server::routes::{
    add_papers_handler, ask_question_handler, compare_papers_handler, create_group_handler,
    delete_group_handler, delete_paper_handler, get_group_handler, health_handler,
    list_groups_handler, list_papers_handler, remove_paper_handler, update_group_handler,
    upload_paper_handler,
};
use crate::server::service::LibraryService;

pub use errors::AppError;

/// Uploads above this size are refused before reaching the handler.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Everything is served under `/api`, matching the real backend.
pub fn router(service: LibraryService) -> Router {
    let api = Router::new()
        .route(paths::HEALTH, get(health_handler))
        .route(paths::LIST_PAPERS, get(list_papers_handler))
        .route(paths::UPLOAD_PAPER, post(upload_paper_handler))
        .route("/delete_paper/{id}", delete(delete_paper_handler))
        .route(
            paths::GROUPS,
            get(list_groups_handler).post(create_group_handler),
        )
        .route(
            "/groups/{id}",
            get(get_group_handler)
                .put(update_group_handler)
                .delete(delete_group_handler),
        )
        .route("/groups/{id}/papers", post(add_papers_handler))
        .route("/groups/{id}/papers/{paper_id}", delete(remove_paper_handler))
        .route(paths::ASK_QUESTION, post(ask_question_handler))
        .route(paths::COMPARE_PAPERS, post(compare_papers_handler))
        .with_state(service);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Router over fresh, empty repositories.
pub fn in_memory() -> Router {
    router(LibraryService::new(
        PaperRepository::new(),
        GroupRepository::new(),
    ))
}
