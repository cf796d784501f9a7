use crate::domain::book::Book;
use crate::domain::value_objects::{BookId, Isbn};
use crate::ports::book_store::{BookStore, CopyTransition, Result};
use async_trait::async_trait;

use super::{paginate, MemoryLibrary};

#[async_trait]
impl BookStore for MemoryLibrary {
    async fn insert(&self, book: Book) -> Result<()> {
        self.state().books.insert(book.book_id, book);
        Ok(())
    }

    async fn get(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.state().books.get(&book_id).cloned())
    }

    async fn get_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        Ok(self
            .state()
            .books
            .values()
            .find(|b| &b.isbn == isbn)
            .cloned())
    }

    async fn update(&self, book: Book) -> Result<Option<Book>> {
        let mut state = self.state();
        if !state.books.contains_key(&book.book_id) {
            return Ok(None);
        }
        state.books.insert(book.book_id, book.clone());
        Ok(Some(book))
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        Ok(self.state().books.remove(&book_id).is_some())
    }

    /// タイトルまたは著者への大文字小文字を無視した部分一致検索
    ///
    /// HashMapの列挙順は不定のため、ページングの安定性のために
    /// タイトル（同タイトルはISBN）で整列してから切り出す。
    async fn list(
        &self,
        search: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<Book>, u64)> {
        let state = self.state();
        let needle = search.map(|q| q.to_lowercase());

        let mut matched: Vec<Book> = state
            .books
            .values()
            .filter(|b| match &needle {
                Some(q) => {
                    b.title.to_lowercase().contains(q) || b.author.to_lowercase().contains(q)
                }
                None => true,
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            (a.title.to_lowercase(), a.isbn.as_str()).cmp(&(b.title.to_lowercase(), b.isbn.as_str()))
        });

        let total = matched.len() as u64;
        Ok((paginate(matched, skip, limit), total))
    }

    async fn checkout_copy(&self, book_id: BookId) -> Result<CopyTransition> {
        let mut state = self.state();
        let Some(book) = state.books.get_mut(&book_id) else {
            return Ok(CopyTransition::NotFound);
        };

        // 条件判定と減算は同一ロック内で行われる
        match book.copies.checkout() {
            Ok(copies) => {
                book.copies = copies;
                Ok(CopyTransition::Applied(book.clone()))
            }
            Err(_) => Ok(CopyTransition::NoCopies),
        }
    }

    async fn checkin_copy(&self, book_id: BookId) -> Result<CopyTransition> {
        let mut state = self.state();
        let Some(book) = state.books.get_mut(&book_id) else {
            return Ok(CopyTransition::NotFound);
        };

        book.copies = book.copies.check_in();
        Ok(CopyTransition::Applied(book.clone()))
    }
}
