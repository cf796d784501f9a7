use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::application::{circulation, Page};
use crate::domain::commands::{CloseBorrow, OpenBorrow};
use crate::domain::value_objects::{BookId, MemberId};
use crate::ports::StatusFilter;

use super::super::error::ApiError;
use super::super::types::{BorrowListParams, BorrowRequest, BorrowResponse, ReturnRequest};
use super::{page_request, parse_filter, AppState};

/// POST /api/v1/borrow - 書籍を貸し出す
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<BorrowResponse>), ApiError> {
    tracing::info!(
        book_id = %req.book_id,
        member_id = %req.member_id,
        "Borrow request"
    );

    let today = Utc::now().date_naive();
    let cmd = OpenBorrow {
        book_id: BookId::from_uuid(req.book_id),
        member_id: MemberId::from_uuid(req.member_id),
        borrowed_date: req.borrowed_date.unwrap_or(today),
        due_date: req.due_date,
    };
    let view = circulation::borrow_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse::from_view(view, today)),
    ))
}

/// PATCH /api/v1/borrow - 書籍を返却する
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReturnRequest>,
) -> Result<Json<BorrowResponse>, ApiError> {
    tracing::info!(
        book_id = %req.book_id,
        member_id = %req.member_id,
        "Return request"
    );

    let today = Utc::now().date_naive();
    let cmd = CloseBorrow {
        book_id: BookId::from_uuid(req.book_id),
        member_id: MemberId::from_uuid(req.member_id),
        returned_date: req.returned_date.unwrap_or(today),
    };
    let view = circulation::return_book(&state.service_deps, cmd).await?;

    Ok(Json(BorrowResponse::from_view(view, today)))
}

/// GET /api/v1/borrow - 貸出一覧
///
/// クエリパラメータ:
/// - status: borrowed / returned / all（既定はall）
/// - include: book / member / all（既定はall）
/// - sort_by: borrowed_date / due_date / book_title / member_name
/// - order: asc / desc
/// - page, size: ページ指定
pub async fn list_borrows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BorrowListParams>,
) -> Result<Json<Page<BorrowResponse>>, ApiError> {
    let status = parse_filter(params.status)?;
    let include = parse_filter(params.include)?;
    let sort_by = parse_filter(params.sort_by)?;
    let order = parse_filter(params.order)?;
    let request = page_request(params.page, params.size)?;

    let page =
        circulation::list_borrows(&state.service_deps, status, include, sort_by, order, request)
            .await?;

    let today = Utc::now().date_naive();
    Ok(Json(page.map(|view| BorrowResponse::from_view(view, today))))
}

/// GET /api/v1/borrow/active - 貸出中の記録のみの一覧
///
/// `GET /api/v1/borrow?status=borrowed`の固定形。
pub async fn list_active_borrows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BorrowListParams>,
) -> Result<Json<Page<BorrowResponse>>, ApiError> {
    let include = parse_filter(params.include)?;
    let sort_by = parse_filter(params.sort_by)?;
    let order = parse_filter(params.order)?;
    let request = page_request(params.page, params.size)?;

    let page = circulation::list_borrows(
        &state.service_deps,
        StatusFilter::Borrowed,
        include,
        sort_by,
        order,
        request,
    )
    .await?;

    let today = Utc::now().date_naive();
    Ok(Json(page.map(|view| BorrowResponse::from_view(view, today))))
}
