/// 蔵書数のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyCountError {
    /// 総数は1以上でなければならない
    TotalMustBePositive,
    /// 貸出可能数が総数を超えている
    AvailableExceedsTotal { total: u32, available: u32 },
    /// 貸出可能な蔵書がない
    NoCopiesAvailable,
    /// 新しい総数が貸出中の冊数を下回っている
    FewerCopiesThanBorrowed { new_total: u32, borrowed: u32 },
}

/// ISBNのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnError {
    /// 空のISBN
    Empty,
    /// 長すぎるISBN
    TooLong,
}

/// メールアドレスのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// 形式が不正
    InvalidFormat,
}

/// 書籍登録のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterBookError {
    /// タイトルが空
    EmptyTitle,
    /// 著者名が空
    EmptyAuthor,
    /// ISBNが不正
    InvalidIsbn(IsbnError),
    /// 蔵書数が不正
    InvalidCopyCounts(CopyCountError),
}

impl From<IsbnError> for RegisterBookError {
    fn from(err: IsbnError) -> Self {
        RegisterBookError::InvalidIsbn(err)
    }
}

impl From<CopyCountError> for RegisterBookError {
    fn from(err: CopyCountError) -> Self {
        RegisterBookError::InvalidCopyCounts(err)
    }
}

/// 会員登録のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterMemberError {
    /// 氏名が空
    EmptyName,
    /// メールアドレスが不正
    InvalidEmail(EmailError),
}

impl From<EmailError> for RegisterMemberError {
    fn from(err: EmailError) -> Self {
        RegisterMemberError::InvalidEmail(err)
    }
}

/// 貸出開始のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenBorrowError {
    /// 返却期限が貸出日以前
    InvalidDateRange,
    /// 貸出日が未来
    BorrowedDateInFuture,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseBorrowError {
    /// 既に返却済み
    AlreadyReturned,
    /// 返却日が貸出日より前
    ReturnedBeforeBorrowed,
}
