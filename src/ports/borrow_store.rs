use crate::domain::book::Book;
use crate::domain::borrow::BorrowRecord;
use crate::domain::member::Member;
use crate::domain::value_objects::{BookId, BorrowId, MemberId};
use async_trait::async_trait;
use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出記録のステータスフィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// 貸出中のみ（returned_dateなし）
    Borrowed,
    /// 返却済みのみ（returned_dateあり）
    Returned,
    /// フィルタなし
    #[default]
    All,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Borrowed => "borrowed",
            StatusFilter::Returned => "returned",
            StatusFilter::All => "all",
        }
    }

    /// 記録がこのフィルタに一致するか
    pub fn matches(&self, record: &BorrowRecord) -> bool {
        match self {
            StatusFilter::Borrowed => record.is_active(),
            StatusFilter::Returned => !record.is_active(),
            StatusFilter::All => true,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "borrowed" => Ok(StatusFilter::Borrowed),
            "returned" => Ok(StatusFilter::Returned),
            "all" => Ok(StatusFilter::All),
            _ => Err(format!("Invalid status filter: {}", s)),
        }
    }
}

/// 一覧のソートキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    BorrowedDate,
    DueDate,
    BookTitle,
    MemberName,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "borrowed_date" => Ok(SortKey::BorrowedDate),
            "due_date" => Ok(SortKey::DueDate),
            "book_title" | "book" => Ok(SortKey::BookTitle),
            "member_name" | "member" => Ok(SortKey::MemberName),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

/// ソート順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// 一覧に添付する非正規化スナップショットの選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Include {
    Book,
    Member,
    #[default]
    All,
}

impl std::str::FromStr for Include {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "book" => Ok(Include::Book),
            "member" => Ok(Include::Member),
            "all" => Ok(Include::All),
            _ => Err(format!("Invalid include: {}", s)),
        }
    }
}

/// 貸出一覧クエリ
///
/// UI側の可変状態（現在ページ・フィルタ）を明示的で不変な
/// パラメータオブジェクトとして表現する。
#[derive(Debug, Clone)]
pub struct BorrowListQuery {
    pub status: StatusFilter,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub skip: u64,
    pub limit: u64,
}

/// 貸出ビュー
///
/// 表示用に書籍・会員スナップショットを非正規化した読み取り形。
/// 参照先が削除済みの場合、スナップショットは欠落しうる。
#[derive(Debug, Clone)]
pub struct BorrowView {
    pub record: BorrowRecord,
    pub book: Option<Book>,
    pub member: Option<Member>,
}

/// 貸出記録ストアポート
///
/// 記録は履歴として保持され、削除する操作は存在しない。
#[async_trait]
pub trait BorrowStore: Send + Sync {
    async fn insert(&self, record: BorrowRecord) -> Result<()>;

    /// `(book_id, member_id)`の組の貸出中記録のうち、最も新しく作成された
    /// ものを返す
    ///
    /// 同じ組に複数の貸出中記録が存在することは構造的には防がれていない。
    async fn latest_active(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<Option<BorrowRecord>>;

    /// 記録に返却日を設定する（条件付き更新）
    ///
    /// 対象は貸出中の記録に限られる。記録が存在しない、または既に
    /// 返却済みの場合は`None`を返し、書き込みは行われない。`checkout_copy`の
    /// 条件付き減算と同様に、判定と書き込みはストア内で不可分に実行される。
    async fn mark_returned(
        &self,
        borrow_id: BorrowId,
        returned_date: NaiveDate,
    ) -> Result<Option<BorrowRecord>>;

    /// 書籍の貸出中記録の件数
    ///
    /// 蔵書数不変条件 `total - available == active_count` の確認と、
    /// 削除・総数変更のガードに使用される。
    async fn active_count_for_book(&self, book_id: BookId) -> Result<u64>;

    /// フィルタ・ソート・ページ指定で貸出一覧を取得する
    ///
    /// 結果はページの項目列と、フィルタに一致する総件数（ページとは独立）の組。
    async fn list(&self, query: &BorrowListQuery, include: Include)
        -> Result<(Vec<BorrowView>, u64)>;

    /// 会員の貸出履歴を取得する
    async fn list_for_member(
        &self,
        member_id: MemberId,
        status: StatusFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<BorrowView>, u64)>;
}
