use crate::domain::{Item, ItemId, ItemRequestId, Page, UserId};
use async_trait::async_trait;

pub type Result<T> = super::PortResult<T>;

/// アイテムリポジトリポート
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert(&self, item: Item) -> Result<()>;

    async fn update(&self, item: Item) -> Result<()>;

    async fn get_by_id(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// オーナーのアイテムをID昇順（作成順）でページングして返す
    async fn find_by_owner(&self, owner_id: UserId, page: Page) -> Result<Vec<Item>>;

    /// 貸出可能なアイテムを名前・説明の部分一致で検索する
    ///
    /// 大文字小文字を区別しない。ID昇順。
    async fn search_available(&self, text: &str, page: Page) -> Result<Vec<Item>>;

    /// 指定リクエストに応えて出品されたアイテムを返す
    async fn find_by_request_ids(&self, request_ids: &[ItemRequestId]) -> Result<Vec<Item>>;

    /// 削除した場合は true
    async fn delete(&self, item_id: ItemId) -> Result<bool>;
}
