use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, MemberId};

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
}

/// コマンド：書籍を更新する（部分更新）
///
/// `available_copies`は直接編集できない。総数の変更に応じて導出される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub total_copies: Option<u32>,
}

/// コマンド：会員を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMember {
    pub name: String,
    pub email: String,
}

/// コマンド：会員を更新する（部分更新）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBorrow {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrowed_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// コマンド：書籍を返却する
///
/// 記録IDではなく `(book_id, member_id)` の組で対象を特定する。
/// 同じ組に複数の貸出中記録がある場合は最新のものが選択される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseBorrow {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub returned_date: NaiveDate,
}
