pub mod book_store;
pub mod borrow_store;
pub mod member_store;

pub use book_store::{BookStore, CopyTransition};
pub use borrow_store::{
    BorrowListQuery, BorrowStore, BorrowView, Include, SortKey, SortOrder, StatusFilter,
};
pub use member_store::MemberStore;
