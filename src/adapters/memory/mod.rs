mod book_store;
mod borrow_store;
mod member_store;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::book::Book;
use crate::domain::borrow::BorrowRecord;
use crate::domain::member::Member;
use crate::domain::value_objects::{BookId, MemberId};

/// インメモリの蔵書・会員・貸出状態
///
/// `borrows`は作成順を保持する。最新の貸出中記録の選択は
/// この順序に依存する。
#[derive(Debug, Default)]
pub(crate) struct LibraryState {
    pub books: HashMap<BookId, Book>,
    pub members: HashMap<MemberId, Member>,
    pub borrows: Vec<BorrowRecord>,
}

/// インメモリストアアダプタ
///
/// 3つのストアポートすべてを単一のMutexの背後で実装する。
/// このMutexが貸出・返却のカウンタ更新を直列化する地点であり、
/// `checkout_copy`の条件判定と減算はロック内で不可分に行われる。
#[derive(Clone)]
pub struct MemoryLibrary {
    inner: Arc<Mutex<LibraryState>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LibraryState::default())),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, LibraryState> {
        self.inner.lock().unwrap()
    }
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// skip/limitによるページ切り出し
pub(crate) fn paginate<T>(items: Vec<T>, skip: u64, limit: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}
