use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{books, borrow, members, AppState};

/// Creates the API router with all circulation endpoints
///
/// Catalog endpoints:
/// - POST /api/v1/books - Register a book
/// - GET /api/v1/books - List books (search + pagination)
/// - PATCH /api/v1/books/:id - Update a book
/// - DELETE /api/v1/books/:id - Delete a book
///
/// Member endpoints:
/// - POST /api/v1/members - Register a member
/// - GET /api/v1/members - List members
/// - PATCH /api/v1/members/:id - Update a member
/// - DELETE /api/v1/members/:id - Delete a member
/// - GET /api/v1/members/:id/borrows - Member borrow history
///
/// Circulation endpoints:
/// - POST /api/v1/borrow - Borrow a book
/// - PATCH /api/v1/borrow - Return a book
/// - GET /api/v1/borrow - List borrow records (filter/sort/paginate)
/// - GET /api/v1/borrow/active - List active borrow records
pub fn create_router(state: Arc<AppState>) -> Router {
    let books_routes = Router::new()
        .route("/", post(books::create_book).get(books::list_books))
        .route("/:id", patch(books::update_book).delete(books::delete_book));

    let members_routes = Router::new()
        .route("/", post(members::create_member).get(members::list_members))
        .route("/:id", patch(members::update_member).delete(members::delete_member))
        .route("/:id/borrows", get(members::member_borrows));

    let borrow_routes = Router::new()
        .route(
            "/",
            post(borrow::borrow_book)
                .patch(borrow::return_book)
                .get(borrow::list_borrows),
        )
        .route("/active", get(borrow::list_active_borrows));

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .nest("/api/v1/books", books_routes)
        .nest("/api/v1/members", members_routes)
        .nest("/api/v1/borrow", borrow_routes)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
