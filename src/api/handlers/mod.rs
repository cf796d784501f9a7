pub mod books;
pub mod borrow;
pub mod members;

use std::str::FromStr;

use crate::application::{PageRequest, ServiceDependencies, ServiceError};

use super::error::ApiError;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// クエリパラメータからページ指定を組み立てる
///
/// 省略時は1ページ目・既定サイズ。範囲外は422。
pub(super) fn page_request(page: Option<u32>, size: Option<u32>) -> Result<PageRequest, ApiError> {
    PageRequest::new(
        page.unwrap_or(1),
        size.unwrap_or(PageRequest::DEFAULT_SIZE),
    )
    .map_err(ApiError::from)
}

/// 列挙型クエリパラメータのパースとバリデーション
///
/// 省略時は各型の既定値。不正な値は422。
pub(super) fn parse_filter<T>(value: Option<String>) -> Result<T, ApiError>
where
    T: FromStr<Err = String> + Default,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| ApiError::from(ServiceError::Validation(e))),
        None => Ok(T::default()),
    }
}
