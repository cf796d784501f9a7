use crate::domain::borrow::BorrowRecord;
use crate::domain::value_objects::{BookId, BorrowId, MemberId};
use crate::ports::borrow_store::{
    BorrowListQuery, BorrowStore, BorrowView, Include, Result, SortKey, SortOrder, StatusFilter,
};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{paginate, LibraryState, MemoryLibrary};

/// 記録に書籍・会員スナップショットを結合する
///
/// 参照先が削除済みの場合はスナップショットなしのビューになる。
fn join_view(state: &LibraryState, record: &BorrowRecord) -> BorrowView {
    BorrowView {
        record: record.clone(),
        book: state.books.get(&record.book_id).cloned(),
        member: state.members.get(&record.member_id).cloned(),
    }
}

/// includeの指定に合わせてスナップショットを落とす
fn apply_include(mut view: BorrowView, include: Include) -> BorrowView {
    match include {
        Include::Book => view.member = None,
        Include::Member => view.book = None,
        Include::All => {}
    }
    view
}

fn sort_views(views: &mut [BorrowView], sort_by: SortKey, order: SortOrder) {
    // 比較方向をコンパレータ内で切り替え、同値の元順序を保つ
    views.sort_by(|a, b| {
        let ordering = match sort_by {
            SortKey::BorrowedDate => a.record.borrowed_date.cmp(&b.record.borrowed_date),
            SortKey::DueDate => a.record.due_date.cmp(&b.record.due_date),
            SortKey::BookTitle => title_key(a).cmp(&title_key(b)),
            SortKey::MemberName => member_key(a).cmp(&member_key(b)),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn title_key(view: &BorrowView) -> String {
    view.book
        .as_ref()
        .map(|b| b.title.to_lowercase())
        .unwrap_or_default()
}

fn member_key(view: &BorrowView) -> String {
    view.member
        .as_ref()
        .map(|m| m.name.to_lowercase())
        .unwrap_or_default()
}

#[async_trait]
impl BorrowStore for MemoryLibrary {
    async fn insert(&self, record: BorrowRecord) -> Result<()> {
        self.state().borrows.push(record);
        Ok(())
    }

    async fn latest_active(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<Option<BorrowRecord>> {
        let state = self.state();
        // borrowsは作成順なので、末尾からの走査で最新の記録を得る
        Ok(state
            .borrows
            .iter()
            .rev()
            .find(|r| r.book_id == book_id && r.member_id == member_id && r.is_active())
            .cloned())
    }

    async fn mark_returned(
        &self,
        borrow_id: BorrowId,
        returned_date: NaiveDate,
    ) -> Result<Option<BorrowRecord>> {
        let mut state = self.state();
        // 判定と書き込みは同一ロック内。貸出中の記録のみが対象となるため、
        // 同じ記録を観測した2つの返却のうち勝者は1つに限られる
        let Some(record) = state
            .borrows
            .iter_mut()
            .find(|r| r.borrow_id == borrow_id && r.is_active())
        else {
            return Ok(None);
        };
        record.returned_date = Some(returned_date);
        Ok(Some(record.clone()))
    }

    async fn active_count_for_book(&self, book_id: BookId) -> Result<u64> {
        let state = self.state();
        Ok(state
            .borrows
            .iter()
            .filter(|r| r.book_id == book_id && r.is_active())
            .count() as u64)
    }

    async fn list(
        &self,
        query: &BorrowListQuery,
        include: Include,
    ) -> Result<(Vec<BorrowView>, u64)> {
        let state = self.state();

        // ソートには書籍・会員の結合が必要なため、includeに関わらず結合し、
        // スナップショットの間引きはページ確定後に行う
        let mut views: Vec<BorrowView> = state
            .borrows
            .iter()
            .filter(|r| query.status.matches(r))
            .map(|r| join_view(&state, r))
            .collect();

        sort_views(&mut views, query.sort_by, query.order);

        let total = views.len() as u64;
        let page = paginate(views, query.skip, query.limit)
            .into_iter()
            .map(|v| apply_include(v, include))
            .collect();

        Ok((page, total))
    }

    async fn list_for_member(
        &self,
        member_id: MemberId,
        status: StatusFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<BorrowView>, u64)> {
        let state = self.state();

        let views: Vec<BorrowView> = state
            .borrows
            .iter()
            .filter(|r| r.member_id == member_id && status.matches(r))
            .map(|r| join_view(&state, r))
            .collect();

        let total = views.len() as u64;
        Ok((paginate(views, skip, limit), total))
    }
}
