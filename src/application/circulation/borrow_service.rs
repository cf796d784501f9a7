use chrono::Utc;

use crate::domain::commands::{CloseBorrow, OpenBorrow};
use crate::domain;
use crate::ports::*;

use super::super::errors::{Result, ServiceError};
use super::super::ServiceDependencies;

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 返却期限が貸出日より厳密に後、貸出日が未来でないこと
///   （ストアへアクセスする前に検証される）
/// - 会員と書籍が存在すること
/// - 書籍に貸出可能な蔵書があること
///
/// 蔵書カウンタの減算は`checkout_copy`による単一の権威あるゲートで行われ、
/// 貸出可能数Nの書籍に対して同時に成功する貸出は高々Nに制限される。
/// 減算後の記録作成が失敗した場合はカウンタを戻してから報告するため、
/// 記録なしの減算が残ることはない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出コマンド
///
/// # 戻り値
/// 作成された貸出記録（表示用の書籍・会員スナップショット付き）
pub async fn borrow_book(deps: &ServiceDependencies, cmd: OpenBorrow) -> Result<BorrowView> {
    tracing::debug!(
        book_id = %cmd.book_id.value(),
        member_id = %cmd.member_id.value(),
        "Process borrow request"
    );

    // 1. ローカルバリデーション（ドメイン層の純粋関数）
    let today = Utc::now().date_naive();
    let record = domain::open_borrow(
        cmd.book_id,
        cmd.member_id,
        cmd.borrowed_date,
        cmd.due_date,
        today,
    )?;

    // 2. 会員の存在確認
    let member = deps
        .member_store
        .get(cmd.member_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::MemberNotFound)?;

    // 3. 蔵書カウンタの条件付き減算（存在確認を兼ねる）
    let book = match deps
        .book_store
        .checkout_copy(cmd.book_id)
        .await
        .map_err(ServiceError::store)?
    {
        CopyTransition::Applied(book) => book,
        CopyTransition::NoCopies => return Err(ServiceError::NoCopiesAvailable),
        CopyTransition::NotFound => return Err(ServiceError::BookNotFound),
    };

    // 4. 記録の作成。失敗した場合は減算を補償してから報告する
    if let Err(e) = deps.borrow_store.insert(record.clone()).await {
        let _ = deps.book_store.checkin_copy(cmd.book_id).await;
        return Err(ServiceError::store(e));
    }

    Ok(BorrowView {
        record,
        book: Some(book),
        member: Some(member),
    })
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - `(book_id, member_id)`の組に貸出中の記録が存在すること。
///   複数存在する場合は最も新しく作成されたものが選択される
/// - 返却は一度きりで、返却後の変更はない
/// - 延滞していても返却は受け付ける
///
/// 蔵書カウンタは総数を上限として1冊分戻される。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 返却コマンド
///
/// # 戻り値
/// 返却済みとなった貸出記録（表示用スナップショット付き）
pub async fn return_book(deps: &ServiceDependencies, cmd: CloseBorrow) -> Result<BorrowView> {
    tracing::debug!(
        book_id = %cmd.book_id.value(),
        member_id = %cmd.member_id.value(),
        "Process return request"
    );

    // 1. 書籍の存在確認
    deps.book_store
        .get(cmd.book_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::BookNotFound)?;

    // 2. 最新の貸出中記録を特定
    let active = deps
        .borrow_store
        .latest_active(cmd.book_id, cmd.member_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::NoActiveBorrow)?;

    // 3. ドメイン層の純粋関数で返却を検証
    let closed = domain::close_borrow(&active, cmd.returned_date)?;

    // 4. 記録の更新（条件付き）。並行する返却が先に同じ記録を閉じて
    //    いた場合はここでNoActiveBorrowとなり、カウンタには触れない
    let record = deps
        .borrow_store
        .mark_returned(closed.borrow_id, cmd.returned_date)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::NoActiveBorrow)?;

    // 5. 蔵書カウンタを戻す（総数を上限とする）
    let book = match deps
        .book_store
        .checkin_copy(cmd.book_id)
        .await
        .map_err(ServiceError::store)?
    {
        CopyTransition::Applied(book) => Some(book),
        _ => None,
    };

    let member = deps
        .member_store
        .get(cmd.member_id)
        .await
        .map_err(ServiceError::store)?;

    Ok(BorrowView { record, book, member })
}
