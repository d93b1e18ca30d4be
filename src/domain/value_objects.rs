use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 識別子の値オブジェクトを定義する
///
/// UUID v7（時系列順）を使うため、IDの昇順は作成順と一致する。
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// ユーザーID
    UserId
);
entity_id!(
    /// アイテムID - 貸し出される物品の集約ID
    ItemId
);
entity_id!(
    /// 予約ID
    BookingId
);
entity_id!(
    /// コメントID
    CommentId
);
entity_id!(
    /// アイテムリクエストID
    ItemRequestId
);

/// ページングのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// ページ番号が負
    NegativeIndex(i64),
    /// ページサイズが0以下
    NonPositiveSize(i64),
    /// index × size が i64 に収まらない
    OffsetOverflow { index: i64, size: i64 },
}

/// ページ指定
///
/// 不変条件：index >= 0 かつ size > 0、かつ index × size が i64 に収まる。
/// offset/limit 方式で、offset = index × size。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: i64,
    size: i64,
}

impl Page {
    pub fn new(index: i64, size: i64) -> Result<Self, PageError> {
        if index < 0 {
            return Err(PageError::NegativeIndex(index));
        }
        if size <= 0 {
            return Err(PageError::NonPositiveSize(size));
        }
        if index.checked_mul(size).is_none() {
            return Err(PageError::OffsetOverflow { index, size });
        }
        Ok(Self { index, size })
    }

    /// 要素オフセット（`from`）からページを作る
    ///
    /// HTTPクエリの `from`/`size` 形式。`from` はページ境界に切り捨てられる。
    pub fn from_offset(from: i64, size: i64) -> Result<Self, PageError> {
        if from < 0 {
            return Err(PageError::NegativeIndex(from));
        }
        if size <= 0 {
            return Err(PageError::NonPositiveSize(size));
        }
        Self::new(from / size, size)
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.index * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// スライスにページを適用する（インメモリ実装用）
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .cloned()
            .collect()
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NegativeIndex(index) => write!(f, "page index must not be negative: {index}"),
            PageError::NonPositiveSize(size) => write!(f, "page size must be positive: {size}"),
            PageError::OffsetOverflow { index, size } => {
                write!(f, "page {index} of size {size} is out of range")
            }
        }
    }
}
