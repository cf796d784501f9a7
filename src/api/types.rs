use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::book::Book;
use crate::domain::member::Member;
use crate::domain::overdue::classify;
use crate::ports::BorrowView;

fn default_total_copies() -> u32 {
    1
}

/// 書籍登録リクエスト（POST /api/v1/books）
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default = "default_total_copies")]
    pub total_copies: u32,
}

/// 書籍更新リクエスト（PATCH /api/v1/books/:id）
///
/// `available_copies`は受け付けない（総数から導出される）。
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub total_copies: Option<u32>,
}

/// 会員登録リクエスト（POST /api/v1/members）
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
}

/// 会員更新リクエスト（PATCH /api/v1/members/:id）
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// 貸出リクエスト（POST /api/v1/borrow）
///
/// `borrowed_date`省略時は当日扱い。
#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    pub member_id: Uuid,
    pub book_id: Uuid,
    pub borrowed_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
}

/// 返却リクエスト（PATCH /api/v1/borrow）
///
/// `returned_date`省略時は当日扱い。
#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub member_id: Uuid,
    pub book_id: Uuid,
    pub returned_date: Option<NaiveDate>,
}

/// 書籍一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct BookListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// タイトルまたは著者への部分一致検索
    pub q: Option<String>,
}

/// ページ指定のみのクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 貸出一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct BorrowListParams {
    /// borrowed / returned / all
    pub status: Option<String>,
    /// book / member / all
    pub include: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// borrowed_date / due_date / book_title / member_name
    pub sort_by: Option<String>,
    /// asc / desc
    pub order: Option<String>,
}

/// 会員の貸出履歴のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct MemberBorrowsParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.book_id.value(),
            title: book.title,
            author: book.author,
            isbn: book.isbn.to_string(),
            total_copies: book.copies.total(),
            available_copies: book.copies.available(),
        }
    }
}

/// 会員レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.member_id.value(),
            name: member.name,
            email: member.email.to_string(),
        }
    }
}

/// 貸出レスポンス
///
/// `status`は延滞分類（on_time / overdue / returned_late）。
/// 一覧でも単体でも同じ純粋関数で分類され、ビューごとの重複計算はない。
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberResponse>,
}

impl BorrowResponse {
    pub fn from_view(view: BorrowView, today: NaiveDate) -> Self {
        let record = view.record;
        let status = classify(record.due_date, record.returned_date, today);

        Self {
            id: record.borrow_id.value(),
            book_id: record.book_id.value(),
            member_id: record.member_id.value(),
            borrowed_date: record.borrowed_date,
            due_date: record.due_date,
            returned_date: record.returned_date,
            status: status.as_str().to_string(),
            book: view.book.map(BookResponse::from),
            member: view.member.map(MemberResponse::from),
        }
    }
}

/// エラーレスポンス
///
/// 非2xx応答は`detail`フィールドでメッセージを運ぶ。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
