use serde::Serialize;

use super::errors::RegisterBookError;
use super::value_objects::{BookId, CopyCounts, Isbn};

/// Book集約 - 1タイトル分の蔵書
///
/// 物理的な1冊は個別に識別せず、`copies`で集計のみ行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    #[serde(flatten)]
    pub copies: CopyCounts,
}

/// 純粋関数：書籍を登録する
///
/// ビジネスルール：
/// - タイトル・著者は空でない
/// - 登録時点では全冊貸出可能（貸出可能数は総数から導出される）
///
/// 副作用なし。新しいBookを返す。
pub fn register_book(
    title: &str,
    author: &str,
    isbn: &str,
    total_copies: u32,
) -> Result<Book, RegisterBookError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RegisterBookError::EmptyTitle);
    }
    let author = author.trim();
    if author.is_empty() {
        return Err(RegisterBookError::EmptyAuthor);
    }

    Ok(Book {
        book_id: BookId::new(),
        title: title.to_string(),
        author: author.to_string(),
        isbn: Isbn::parse(isbn)?,
        copies: CopyCounts::full(total_copies)?,
    })
}
