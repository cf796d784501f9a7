mod borrow_service;
mod queries;

pub use borrow_service::{borrow_book, return_book};
pub use queries::{list_borrows, member_borrows};
