use crate::domain::book::Book;
use crate::domain::value_objects::{BookId, Isbn};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書カウンタの条件付き更新の結果
#[derive(Debug, Clone)]
pub enum CopyTransition {
    /// 更新後のBook
    Applied(Book),
    /// 貸出可能な蔵書がない（checkout時のみ）
    NoCopies,
    /// 書籍が存在しない
    NotFound,
}

/// 書籍ストアポート
///
/// 蔵書カタログの永続化境界。実体は外部のRESTサーバだが、
/// このポートの背後に隠れる。
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert(&self, book: Book) -> Result<()>;

    async fn get(&self, book_id: BookId) -> Result<Option<Book>>;

    /// ISBN一意性チェックに使用される
    async fn get_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;

    /// 書籍を置き換える。存在しない場合は`None`を返す
    async fn update(&self, book: Book) -> Result<Option<Book>>;

    /// 書籍を削除する。削除した場合は`true`を返す
    async fn delete(&self, book_id: BookId) -> Result<bool>;

    /// 書籍一覧を取得する
    ///
    /// `search`はタイトルまたは著者に対する大文字小文字を無視した部分一致。
    /// 結果はページの項目列と、フィルタに一致する総件数の組。
    async fn list(&self, search: Option<&str>, skip: u64, limit: u64)
        -> Result<(Vec<Book>, u64)>;

    /// 1冊貸し出す：`available_copies > 0`を条件とした単一の権威ある減算
    ///
    /// 条件判定と減算はストア内で不可分に実行される。貸出可能数Nの書籍に
    /// 対して同時に成功する貸出は高々Nで、カウンタが負になることはない。
    async fn checkout_copy(&self, book_id: BookId) -> Result<CopyTransition>;

    /// 1冊返却する：`total_copies`を上限とした加算
    async fn checkin_copy(&self, book_id: BookId) -> Result<CopyTransition>;
}
