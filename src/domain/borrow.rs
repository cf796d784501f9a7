use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::{CloseBorrowError, OpenBorrowError};
use super::value_objects::{BookId, BorrowId, MemberId};

/// BorrowRecord集約 - 1冊の書籍の1回の貸出
///
/// `returned_date`が`None`の間は貸出中（active）。
/// 返却は一度きりで、返却後の再変更はない。履歴として削除もされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub borrow_id: BorrowId,

    // 他の集約への参照（IDのみ）
    pub book_id: BookId,
    pub member_id: MemberId,

    // 日付はカレンダー日付で比較する（時刻は持たない）
    pub borrowed_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
}

impl BorrowRecord {
    /// 貸出中（未返却）か
    pub fn is_active(&self) -> bool {
        self.returned_date.is_none()
    }
}

/// 純粋関数：貸出を開始する
///
/// ビジネスルール：
/// - 返却期限は貸出日より厳密に後
/// - 貸出日は未来でない
///
/// ストアへのアクセス前に呼び出され、入力不備を先に弾く。
/// 副作用なし。新しいBorrowRecordを返す。
pub fn open_borrow(
    book_id: BookId,
    member_id: MemberId,
    borrowed_date: NaiveDate,
    due_date: NaiveDate,
    today: NaiveDate,
) -> Result<BorrowRecord, OpenBorrowError> {
    if due_date <= borrowed_date {
        return Err(OpenBorrowError::InvalidDateRange);
    }
    if borrowed_date > today {
        return Err(OpenBorrowError::BorrowedDateInFuture);
    }

    Ok(BorrowRecord {
        borrow_id: BorrowId::new(),
        book_id,
        member_id,
        borrowed_date,
        due_date,
        returned_date: None,
    })
}

/// 純粋関数：貸出を終了する（返却）
///
/// ビジネスルール：
/// - 既に返却済みの記録は変更不可（終端状態）
/// - 返却日は貸出日より前でない
/// - 延滞していても返却は受け付ける
///
/// 副作用なし。返却済みの新しいBorrowRecordを返す。
pub fn close_borrow(
    record: &BorrowRecord,
    returned_date: NaiveDate,
) -> Result<BorrowRecord, CloseBorrowError> {
    if record.returned_date.is_some() {
        return Err(CloseBorrowError::AlreadyReturned);
    }
    if returned_date < record.borrowed_date {
        return Err(CloseBorrowError::ReturnedBeforeBorrowed);
    }

    Ok(BorrowRecord {
        returned_date: Some(returned_date),
        ..record.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_borrow_creates_active_record() {
        let book_id = BookId::new();
        let member_id = MemberId::new();

        let record = open_borrow(
            book_id,
            member_id,
            date(2024, 1, 10),
            date(2024, 1, 17),
            date(2024, 1, 10),
        )
        .unwrap();

        assert!(record.is_active());
        assert_eq!(record.book_id, book_id);
        assert_eq!(record.member_id, member_id);
        assert_eq!(record.borrowed_date, date(2024, 1, 10));
        assert_eq!(record.due_date, date(2024, 1, 17));
    }

    #[test]
    fn test_open_borrow_rejects_due_date_not_after_borrowed() {
        // 同日も不可（厳密に後であること）
        let result = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 10),
            date(2024, 1, 10),
            date(2024, 1, 10),
        );
        assert_eq!(result.unwrap_err(), OpenBorrowError::InvalidDateRange);

        let result = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 10),
            date(2024, 1, 9),
            date(2024, 1, 10),
        );
        assert_eq!(result.unwrap_err(), OpenBorrowError::InvalidDateRange);
    }

    #[test]
    fn test_open_borrow_rejects_future_borrowed_date() {
        let result = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 11),
            date(2024, 1, 20),
            date(2024, 1, 10),
        );
        assert_eq!(result.unwrap_err(), OpenBorrowError::BorrowedDateInFuture);
    }

    #[test]
    fn test_close_borrow_sets_returned_date() {
        let record = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 10),
            date(2024, 1, 17),
            date(2024, 1, 10),
        )
        .unwrap();

        let returned = close_borrow(&record, date(2024, 1, 15)).unwrap();
        assert!(!returned.is_active());
        assert_eq!(returned.returned_date, Some(date(2024, 1, 15)));
        // 他のフィールドは変化しない
        assert_eq!(returned.borrow_id, record.borrow_id);
        assert_eq!(returned.due_date, record.due_date);
    }

    #[test]
    fn test_close_borrow_is_terminal() {
        let record = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 10),
            date(2024, 1, 17),
            date(2024, 1, 10),
        )
        .unwrap();
        let returned = close_borrow(&record, date(2024, 1, 15)).unwrap();

        let result = close_borrow(&returned, date(2024, 1, 16));
        assert_eq!(result.unwrap_err(), CloseBorrowError::AlreadyReturned);
    }

    #[test]
    fn test_close_borrow_rejects_return_before_borrowed() {
        let record = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 10),
            date(2024, 1, 17),
            date(2024, 1, 10),
        )
        .unwrap();

        let result = close_borrow(&record, date(2024, 1, 9));
        assert_eq!(result.unwrap_err(), CloseBorrowError::ReturnedBeforeBorrowed);
    }
}
