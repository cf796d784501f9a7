use crate::domain::value_objects::MemberId;
use crate::ports::*;

use super::super::errors::{Result, ServiceError};
use super::super::paging::{Page, PageRequest};
use super::super::ServiceDependencies;

/// 貸出一覧を取得する
///
/// ステータスフィルタ・ソート・ページ指定はすべて不変なパラメータとして
/// 受け取り、ストアへの問い合わせに変換する。`total`はフィルタに一致する
/// 総件数で、ページ指定とは独立。
pub async fn list_borrows(
    deps: &ServiceDependencies,
    status: StatusFilter,
    include: Include,
    sort_by: SortKey,
    order: SortOrder,
    request: PageRequest,
) -> Result<Page<BorrowView>> {
    let query = BorrowListQuery {
        status,
        sort_by,
        order,
        skip: request.skip(),
        limit: u64::from(request.size()),
    };

    let (items, total) = deps
        .borrow_store
        .list(&query, include)
        .await
        .map_err(ServiceError::store)?;

    Ok(Page::assemble(items, total, &request))
}

/// 会員の貸出履歴を取得する
///
/// 会員が存在しない場合は`MemberNotFound`。
pub async fn member_borrows(
    deps: &ServiceDependencies,
    member_id: MemberId,
    status: StatusFilter,
    request: PageRequest,
) -> Result<Page<BorrowView>> {
    deps.member_store
        .get(member_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::MemberNotFound)?;

    let (items, total) = deps
        .borrow_store
        .list_for_member(member_id, status, request.skip(), u64::from(request.size()))
        .await
        .map_err(ServiceError::store)?;

    Ok(Page::assemble(items, total, &request))
}
