pub mod catalog;
pub mod circulation;
pub mod errors;
pub mod members;
pub mod paging;

use std::sync::Arc;

use crate::ports::{BookStore, BorrowStore, MemberStore};

pub use errors::{Result, ServiceError};
pub use paging::{Page, PageRequest};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// このパターンにより：
/// - すべての依存が明示的
/// - データと振る舞いの分離
/// - テストが明確
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_store: Arc<dyn BookStore>,
    pub member_store: Arc<dyn MemberStore>,
    pub borrow_store: Arc<dyn BorrowStore>,
}
