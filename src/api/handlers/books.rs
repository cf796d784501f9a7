use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{catalog, Page};
use crate::domain::commands::{RegisterBook, UpdateBook};
use crate::domain::value_objects::BookId;

use super::super::error::ApiError;
use super::super::types::{BookListParams, BookResponse, CreateBookRequest, UpdateBookRequest};
use super::{page_request, AppState};

/// POST /api/v1/books - 書籍を登録
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    tracing::info!(title = %req.title, "Creating book");

    let cmd = RegisterBook {
        title: req.title,
        author: req.author,
        isbn: req.isbn,
        total_copies: req.total_copies,
    };
    let book = catalog::create_book(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /api/v1/books - 書籍一覧
///
/// クエリパラメータ:
/// - q: タイトルまたは著者への部分一致検索（オプション）
/// - page, size: ページ指定
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookListParams>,
) -> Result<Json<Page<BookResponse>>, ApiError> {
    let request = page_request(params.page, params.size)?;
    let page = catalog::list_books(&state.service_deps, params.q, request).await?;

    Ok(Json(page.map(BookResponse::from)))
}

/// PATCH /api/v1/books/:id - 書籍を更新（部分更新）
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let cmd = UpdateBook {
        title: req.title,
        author: req.author,
        isbn: req.isbn,
        total_copies: req.total_copies,
    };
    let book =
        catalog::update_book(&state.service_deps, BookId::from_uuid(book_id), cmd).await?;

    Ok(Json(BookResponse::from(book)))
}

/// DELETE /api/v1/books/:id - 書籍を削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(book_id = %book_id, "Deleting book");

    catalog::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
