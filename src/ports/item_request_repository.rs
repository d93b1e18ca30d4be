use crate::domain::{ItemRequest, ItemRequestId, Page, UserId};
use async_trait::async_trait;

pub type Result<T> = super::PortResult<T>;

/// アイテムリクエストリポジトリポート
#[async_trait]
pub trait ItemRequestRepository: Send + Sync {
    async fn insert(&self, request: ItemRequest) -> Result<()>;

    async fn get_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>>;

    async fn exists(&self, request_id: ItemRequestId) -> Result<bool>;

    /// 自分のリクエストを新しい順に返す
    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>>;

    /// 他のユーザーのリクエストを新しい順にページングして返す
    async fn find_by_other_requesters(
        &self,
        requester_id: UserId,
        page: Page,
    ) -> Result<Vec<ItemRequest>>;
}
