use serde::Serialize;

use super::errors::ServiceError;

/// ページ指定
///
/// `page`は1始まり、`size`は1以上`MAX_SIZE`以下。
/// 不正な値は入力不備としてストアアクセス前に拒否される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: u32, size: u32) -> Result<Self, ServiceError> {
        if page < 1 {
            return Err(ServiceError::Validation("page must be at least 1".to_string()));
        }
        if size < 1 || size > Self::MAX_SIZE {
            return Err(ServiceError::Validation(format!(
                "size must be between 1 and {}",
                Self::MAX_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// スキップする件数（0始まりのオフセット）
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// ページ応答
///
/// すべてのページングされた一覧はこの形を共有する。
/// `total`はフィルタに一致する総件数で、ページ指定とは独立。
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u64,
}

impl<T> Page<T> {
    /// ストアの結果からページ応答を組み立てる
    ///
    /// `pages = ceil(total / size)`、ただし`total == 0`のときは0。
    pub fn assemble(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let pages = if total == 0 {
            0
        } else {
            total.div_ceil(u64::from(request.size))
        };
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
            pages,
        }
    }

    /// 項目の型を変換する（DTOへの写像用）
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}
