use chrono::NaiveDate;
use serde::Serialize;

/// 延滞ステータス
///
/// 一覧表示用の分類。貸出中か返却済みかを問わず全記録に対して定まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowStatus {
    /// 期限内（返却済みで期限内だった場合も含む）
    OnTime,
    /// 貸出中かつ返却期限超過
    Overdue,
    /// 返却済みだが期限後に返却された
    ReturnedLate,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::OnTime => "on_time",
            BorrowStatus::Overdue => "overdue",
            BorrowStatus::ReturnedLate => "returned_late",
        }
    }
}

/// 純粋関数：延滞判定
///
/// すべての日付の組み合わせに対して定義される全域関数。
/// カレンダー日付で比較し、時刻は考慮しない。
///
/// - 未返却かつ `today > due_date` → `Overdue`
/// - 返却済みかつ `returned_date > due_date` → `ReturnedLate`
/// - それ以外 → `OnTime`（期限内返却と、貸出中でまだ期限前の両方を含む）
pub fn classify(
    due_date: NaiveDate,
    returned_date: Option<NaiveDate>,
    today: NaiveDate,
) -> BorrowStatus {
    match returned_date {
        None if today > due_date => BorrowStatus::Overdue,
        Some(returned) if returned > due_date => BorrowStatus::ReturnedLate,
        _ => BorrowStatus::OnTime,
    }
}
