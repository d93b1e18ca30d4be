use crate::domain::{User, UserId};
use async_trait::async_trait;

pub type Result<T> = super::PortResult<T>;

/// ユーザーリポジトリポート
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 新しいユーザーを保存する
    async fn insert(&self, user: User) -> Result<()>;

    /// ユーザーの全フィールドを上書き保存する
    async fn update(&self, user: User) -> Result<()>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<User>>;

    /// ユーザーが存在するか確認する
    ///
    /// 予約・アイテム操作の前提条件チェックに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// メールアドレスが他のユーザーに使われているか
    ///
    /// `except` を指定すると、そのユーザー自身は除外する（更新時）。
    async fn email_taken(&self, email: &str, except: Option<UserId>) -> Result<bool>;

    /// 全ユーザーを作成順に返す
    async fn find_all(&self) -> Result<Vec<User>>;

    /// 削除した場合は true
    async fn delete(&self, user_id: UserId) -> Result<bool>;
}
