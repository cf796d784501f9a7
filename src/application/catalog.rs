use crate::domain::commands::{RegisterBook, UpdateBook};
use crate::domain::value_objects::{BookId, Isbn};
use crate::domain::{self, Book};

use super::errors::{Result, ServiceError};
use super::paging::{Page, PageRequest};
use super::ServiceDependencies;

/// 書籍を登録する
///
/// ビジネスルール：
/// - タイトル・著者・ISBNが空でないこと
/// - ISBNが既存の書籍と重複しないこと
/// - 登録時点の貸出可能数は総数に等しい（直接指定は不可）
pub async fn create_book(deps: &ServiceDependencies, cmd: RegisterBook) -> Result<Book> {
    tracing::debug!(title = %cmd.title, "Registering book");

    // 1. ドメイン層の純粋関数でバリデーション
    let book = domain::register_book(&cmd.title, &cmd.author, &cmd.isbn, cmd.total_copies)?;

    // 2. ISBN一意性チェック
    let existing = deps
        .book_store
        .get_by_isbn(&book.isbn)
        .await
        .map_err(ServiceError::store)?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateIsbn(book.isbn.to_string()));
    }

    // 3. ストアに保存
    deps.book_store
        .insert(book.clone())
        .await
        .map_err(ServiceError::store)?;

    Ok(book)
}

/// 書籍を更新する（部分更新）
///
/// ビジネスルール：
/// - ISBNを変更する場合は他の書籍と重複しないこと
/// - `available_copies`は直接編集できない。`total_copies`の変更に応じて
///   貸出中の冊数を維持するように導出され、貸出中の冊数を下回る削減は拒否される
pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    cmd: UpdateBook,
) -> Result<Book> {
    let mut book = deps
        .book_store
        .get(book_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::BookNotFound)?;

    if let Some(title) = cmd.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::Validation("title must not be empty".to_string()));
        }
        book.title = title;
    }

    if let Some(author) = cmd.author {
        let author = author.trim().to_string();
        if author.is_empty() {
            return Err(ServiceError::Validation("author must not be empty".to_string()));
        }
        book.author = author;
    }

    if let Some(raw_isbn) = cmd.isbn {
        let isbn = Isbn::parse(&raw_isbn)?;
        if isbn != book.isbn {
            let other = deps
                .book_store
                .get_by_isbn(&isbn)
                .await
                .map_err(ServiceError::store)?;
            if other.is_some() {
                return Err(ServiceError::DuplicateIsbn(isbn.to_string()));
            }
            book.isbn = isbn;
        }
    }

    if let Some(new_total) = cmd.total_copies {
        book.copies = book.copies.resize_total(new_total)?;
    }

    deps.book_store
        .update(book)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::BookNotFound)
}

/// 書籍を削除する
///
/// ビジネスルール：
/// - 貸出中の記録が残っている書籍は削除できない
///   （削除すると蔵書数不変条件の検証が不可能になる）
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    tracing::debug!(book_id = %book_id.value(), "Deleting book");

    let active = deps
        .borrow_store
        .active_count_for_book(book_id)
        .await
        .map_err(ServiceError::store)?;
    if active > 0 {
        return Err(ServiceError::BookHasActiveBorrows);
    }

    let deleted = deps
        .book_store
        .delete(book_id)
        .await
        .map_err(ServiceError::store)?;
    if !deleted {
        return Err(ServiceError::BookNotFound);
    }

    Ok(())
}

/// 書籍一覧を取得する
///
/// `q`はタイトルまたは著者への大文字小文字を無視した部分一致検索。
pub async fn list_books(
    deps: &ServiceDependencies,
    q: Option<String>,
    request: PageRequest,
) -> Result<Page<Book>> {
    let (items, total) = deps
        .book_store
        .list(q.as_deref(), request.skip(), u64::from(request.size()))
        .await
        .map_err(ServiceError::store)?;

    Ok(Page::assemble(items, total, &request))
}
