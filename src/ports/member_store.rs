use crate::domain::member::Member;
use crate::domain::value_objects::{EmailAddress, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員ストアポート
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn insert(&self, member: Member) -> Result<()>;

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// メールアドレス一意性チェックに使用される
    async fn get_by_email(&self, email: &EmailAddress) -> Result<Option<Member>>;

    /// 会員を置き換える。存在しない場合は`None`を返す
    async fn update(&self, member: Member) -> Result<Option<Member>>;

    /// 会員を削除する。削除した場合は`true`を返す
    async fn delete(&self, member_id: MemberId) -> Result<bool>;

    /// 会員一覧（フィルタなし）と総件数を取得する
    async fn list(&self, skip: u64, limit: u64) -> Result<(Vec<Member>, u64)>;
}
