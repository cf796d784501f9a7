use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{circulation, members, Page};
use crate::domain::commands::{RegisterMember, UpdateMember};
use crate::domain::value_objects::MemberId;

use super::super::error::ApiError;
use super::super::types::{
    BorrowResponse, CreateMemberRequest, MemberBorrowsParams, MemberResponse, PageParams,
    UpdateMemberRequest,
};
use super::{page_request, parse_filter, AppState};

/// POST /api/v1/members - 会員を登録
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    tracing::info!(name = %req.name, "Creating member");

    let cmd = RegisterMember {
        name: req.name,
        email: req.email,
    };
    let member = members::create_member(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// GET /api/v1/members - 会員一覧
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<MemberResponse>>, ApiError> {
    let request = page_request(params.page, params.size)?;
    let page = members::list_members(&state.service_deps, request).await?;

    Ok(Json(page.map(MemberResponse::from)))
}

/// PATCH /api/v1/members/:id - 会員を更新（部分更新）
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let cmd = UpdateMember {
        name: req.name,
        email: req.email,
    };
    let member =
        members::update_member(&state.service_deps, MemberId::from_uuid(member_id), cmd).await?;

    Ok(Json(MemberResponse::from(member)))
}

/// DELETE /api/v1/members/:id - 会員を削除
///
/// 貸出履歴は保持される。
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(member_id = %member_id, "Deleting member");

    members::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/members/:id/borrows - 会員の貸出履歴
///
/// ステータスでフィルタ可能。延滞分類は取得時点の日付で行われる。
pub async fn member_borrows(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Query(params): Query<MemberBorrowsParams>,
) -> Result<Json<Page<BorrowResponse>>, ApiError> {
    let status = parse_filter(params.status)?;
    let request = page_request(params.page, params.size)?;

    let page = circulation::member_borrows(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        status,
        request,
    )
    .await?;

    let today = Utc::now().date_naive();
    Ok(Json(page.map(|view| BorrowResponse::from_view(view, today))))
}
