use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{CopyCountError, EmailError, IsbnError};

/// 書籍ID - 蔵書管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 会員ID - 会員管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出記録ID - 貸出履歴の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorrowId(Uuid);

impl BorrowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BorrowId {
    fn default() -> Self {
        Self::new()
    }
}

/// 蔵書数
///
/// 不変条件：`0 <= available <= total` かつ `total >= 1`。
/// 型システムでこの制約を強制し、不正な組み合わせを作成できないようにする。
/// `total - available` が現在貸出中の冊数に一致する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CopyCounts {
    total_copies: u32,
    available_copies: u32,
}

impl CopyCounts {
    /// 総数と貸出可能数を指定して作成
    ///
    /// # エラー
    /// - `total == 0` の場合は `TotalMustBePositive`
    /// - `available > total` の場合は `AvailableExceedsTotal`
    pub fn new(total: u32, available: u32) -> Result<Self, CopyCountError> {
        if total == 0 {
            return Err(CopyCountError::TotalMustBePositive);
        }
        if available > total {
            return Err(CopyCountError::AvailableExceedsTotal { total, available });
        }
        Ok(Self {
            total_copies: total,
            available_copies: available,
        })
    }

    /// 全冊貸出可能な状態で作成（新規登録用）
    pub fn full(total: u32) -> Result<Self, CopyCountError> {
        Self::new(total, total)
    }

    pub fn total(&self) -> u32 {
        self.total_copies
    }

    pub fn available(&self) -> u32 {
        self.available_copies
    }

    /// 現在貸出中の冊数
    pub fn borrowed(&self) -> u32 {
        self.total_copies - self.available_copies
    }

    /// 1冊貸し出す（条件付き減算）
    ///
    /// # エラー
    /// 貸出可能数が0の場合は `NoCopiesAvailable`
    pub fn checkout(self) -> Result<Self, CopyCountError> {
        if self.available_copies == 0 {
            return Err(CopyCountError::NoCopiesAvailable);
        }
        Ok(Self {
            available_copies: self.available_copies - 1,
            ..self
        })
    }

    /// 1冊返却する
    ///
    /// 貸出可能数は総数を上限とする（超過しない）。
    pub fn check_in(self) -> Self {
        Self {
            available_copies: self
                .available_copies
                .saturating_add(1)
                .min(self.total_copies),
            ..self
        }
    }

    /// 総数を変更する
    ///
    /// 貸出可能数は貸出中の冊数を維持するように導出される。
    ///
    /// # エラー
    /// - 新しい総数が0の場合は `TotalMustBePositive`
    /// - 新しい総数が貸出中の冊数を下回る場合は `FewerCopiesThanBorrowed`
    pub fn resize_total(self, new_total: u32) -> Result<Self, CopyCountError> {
        if new_total == 0 {
            return Err(CopyCountError::TotalMustBePositive);
        }
        let borrowed = self.borrowed();
        if new_total < borrowed {
            return Err(CopyCountError::FewerCopiesThanBorrowed { new_total, borrowed });
        }
        Self::new(new_total, new_total - borrowed)
    }
}

/// ISBN
///
/// 蔵書ごとに一意。形式の厳密な検証は行わず、空文字と過大な長さのみ拒否する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub const MAX_LENGTH: usize = 20;

    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IsbnError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(IsbnError::TooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// メールアドレス
///
/// 会員ごとに一意。`@`がちょうど1つ、ローカル部が空でなく、
/// ドメイン部が内部に`.`を含むことのみ検証する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().ok_or(EmailError::InvalidFormat)?;

        if local.is_empty() || domain.contains('@') {
            return Err(EmailError::InvalidFormat);
        }
        // ドメイン部は内部にドットを1つ以上含む
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
