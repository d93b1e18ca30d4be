use crate::domain::{Comment, ItemId};
use async_trait::async_trait;

pub type Result<T> = super::PortResult<T>;

/// コメントリポジトリポート
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<()>;

    /// アイテムのコメントを作成日時の昇順で返す
    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>>;
}
