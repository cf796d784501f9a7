use thiserror::Error;

use crate::domain::errors::{
    CloseBorrowError, CopyCountError, EmailError, IsbnError, OpenBorrowError, RegisterBookError,
    RegisterMemberError,
};

/// アプリケーション層のエラー
///
/// エラーは4つに分類される：
/// - 入力不備（`Validation`）はストア呼び出し前に検出される
/// - 参照先の不在（`*NotFound`）
/// - 業務上の衝突（在庫なし、貸出中記録なし、一意性違反、蔵書数の矛盾）
/// - ストア障害（`StoreError`）
///
/// いずれも自動リトライは行わず、呼び出し元へそのまま報告する。
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 入力不備（ストアへアクセスする前に検出される）
    #[error("{0}")]
    Validation(String),

    /// 書籍が存在しない
    #[error("Book does not exist")]
    BookNotFound,

    /// 会員が存在しない
    #[error("Member does not exist")]
    MemberNotFound,

    /// 貸出可能な蔵書がない
    #[error("No copies available")]
    NoCopiesAvailable,

    /// 対象の貸出中記録が存在しない
    #[error("No active borrow record found for this member and book")]
    NoActiveBorrow,

    /// ISBNが重複している
    #[error("Book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// メールアドレスが重複している
    #[error("Member with email {0} already exists")]
    DuplicateEmail(String),

    /// 総数を貸出中の冊数未満へ削減しようとした
    #[error("Cannot reduce total_copies to {new_total}: {borrowed} copies are currently borrowed")]
    FewerCopiesThanBorrowed { new_total: u32, borrowed: u32 },

    /// 貸出中の書籍は削除できない
    #[error("Cannot delete a book with active borrows")]
    BookHasActiveBorrows,

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    pub fn store(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ServiceError::StoreError(err)
    }
}

impl From<OpenBorrowError> for ServiceError {
    fn from(err: OpenBorrowError) -> Self {
        let msg = match err {
            OpenBorrowError::InvalidDateRange => "due_date must be strictly after borrowed_date",
            OpenBorrowError::BorrowedDateInFuture => "borrowed_date cannot be in the future",
        };
        ServiceError::Validation(msg.to_string())
    }
}

impl From<CloseBorrowError> for ServiceError {
    fn from(err: CloseBorrowError) -> Self {
        match err {
            // 返却済みの記録しか見つからなかった場合と同じ扱い
            CloseBorrowError::AlreadyReturned => ServiceError::NoActiveBorrow,
            CloseBorrowError::ReturnedBeforeBorrowed => ServiceError::Validation(
                "returned_date cannot be before borrowed_date".to_string(),
            ),
        }
    }
}

impl From<RegisterBookError> for ServiceError {
    fn from(err: RegisterBookError) -> Self {
        match err {
            RegisterBookError::EmptyTitle => {
                ServiceError::Validation("title must not be empty".to_string())
            }
            RegisterBookError::EmptyAuthor => {
                ServiceError::Validation("author must not be empty".to_string())
            }
            RegisterBookError::InvalidIsbn(e) => e.into(),
            RegisterBookError::InvalidCopyCounts(e) => e.into(),
        }
    }
}

impl From<RegisterMemberError> for ServiceError {
    fn from(err: RegisterMemberError) -> Self {
        match err {
            RegisterMemberError::EmptyName => {
                ServiceError::Validation("name must not be empty".to_string())
            }
            RegisterMemberError::InvalidEmail(e) => e.into(),
        }
    }
}

impl From<IsbnError> for ServiceError {
    fn from(err: IsbnError) -> Self {
        let msg = match err {
            IsbnError::Empty => "isbn must not be empty",
            IsbnError::TooLong => "isbn is too long",
        };
        ServiceError::Validation(msg.to_string())
    }
}

impl From<EmailError> for ServiceError {
    fn from(_: EmailError) -> Self {
        ServiceError::Validation("email format is invalid".to_string())
    }
}

impl From<CopyCountError> for ServiceError {
    fn from(err: CopyCountError) -> Self {
        match err {
            CopyCountError::TotalMustBePositive => {
                ServiceError::Validation("total_copies must be at least 1".to_string())
            }
            CopyCountError::AvailableExceedsTotal { .. } => {
                ServiceError::Validation("available_copies cannot exceed total_copies".to_string())
            }
            CopyCountError::NoCopiesAvailable => ServiceError::NoCopiesAvailable,
            CopyCountError::FewerCopiesThanBorrowed { new_total, borrowed } => {
                ServiceError::FewerCopiesThanBorrowed { new_total, borrowed }
            }
        }
    }
}

/// アプリケーション層のResult型
pub type Result<T> = std::result::Result<T, ServiceError>;
