use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::ServiceError;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            // 422 Unprocessable Entity - 入力不備（ストア呼び出し前に検出）
            ServiceError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),

            // 404 Not Found - 参照先が存在しない
            ServiceError::BookNotFound | ServiceError::MemberNotFound => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }

            // 409 Conflict - 業務上の衝突
            ServiceError::NoCopiesAvailable
            | ServiceError::NoActiveBorrow
            | ServiceError::DuplicateIsbn(_)
            | ServiceError::DuplicateEmail(_)
            | ServiceError::FewerCopiesThanBorrowed { .. }
            | ServiceError::BookHasActiveBorrows => (StatusCode::CONFLICT, self.0.to_string()),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ServiceError::StoreError(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(detail));
        (status, body).into_response()
    }
}
