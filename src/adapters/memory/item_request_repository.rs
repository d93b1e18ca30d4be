use crate::domain::{ItemRequest, ItemRequestId, Page, UserId};
use crate::ports::item_request_repository::{
    ItemRequestRepository as ItemRequestRepositoryTrait, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;

/// ItemRequestRepositoryのインメモリ実装
pub struct ItemRequestRepository {
    requests: Mutex<HashMap<ItemRequestId, ItemRequest>>,
}

impl ItemRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    fn newest_first(mut requests: Vec<ItemRequest>) -> Vec<ItemRequest> {
        requests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.request_id.cmp(&a.request_id))
        });
        requests
    }

    /// 条件に合うリクエストを削除し、削除したIDを返す
    pub(crate) fn remove_where(
        &self,
        predicate: impl Fn(&ItemRequest) -> bool,
    ) -> Result<Vec<ItemRequestId>> {
        let mut requests = lock(&self.requests)?;
        let removed: Vec<ItemRequestId> = requests
            .values()
            .filter(|r| predicate(r))
            .map(|r| r.request_id)
            .collect();
        for request_id in &removed {
            requests.remove(request_id);
        }
        Ok(removed)
    }
}

impl Default for ItemRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRequestRepositoryTrait for ItemRequestRepository {
    async fn insert(&self, request: ItemRequest) -> Result<()> {
        lock(&self.requests)?.insert(request.request_id, request);
        Ok(())
    }

    async fn get_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>> {
        Ok(lock(&self.requests)?.get(&request_id).cloned())
    }

    async fn exists(&self, request_id: ItemRequestId) -> Result<bool> {
        Ok(lock(&self.requests)?.contains_key(&request_id))
    }

    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>> {
        let requests = lock(&self.requests)?
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(requests))
    }

    async fn find_by_other_requesters(
        &self,
        requester_id: UserId,
        page: Page,
    ) -> Result<Vec<ItemRequest>> {
        let requests = lock(&self.requests)?
            .values()
            .filter(|r| r.requester_id != requester_id)
            .cloned()
            .collect();
        Ok(page.slice(&Self::newest_first(requests)))
    }
}
