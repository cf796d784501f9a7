pub mod book;
pub mod borrow;
pub mod commands;
pub mod errors;
pub mod member;
pub mod overdue;
pub mod value_objects;

pub use book::*;
pub use borrow::*;
pub use errors::*;
pub use member::*;
pub use overdue::*;
pub use value_objects::*;
