use crate::domain::{BookedItem, Item, ItemId, ItemRequestId, Page, UserId, item::matches_search};
use crate::ports::item_repository::{ItemRepository as ItemRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::booking_repository::BookingRepository;
use super::comment_repository::CommentRepository;
use super::lock;

/// ItemRepositoryのインメモリ実装
///
/// アイテムを削除すると、そのアイテムの予約とコメントも削除する。
pub struct ItemRepository {
    items: Mutex<BTreeMap<ItemId, Item>>,
    bookings: Arc<BookingRepository>,
    comments: Arc<CommentRepository>,
}

impl ItemRepository {
    pub fn new(bookings: Arc<BookingRepository>, comments: Arc<CommentRepository>) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            bookings,
            comments,
        }
    }

    /// 条件に合うアイテムを削除し、その予約とコメントも削除する
    pub(crate) fn remove_where(&self, predicate: impl Fn(&Item) -> bool) -> Result<Vec<ItemId>> {
        let removed: Vec<ItemId> = {
            let mut items = lock(&self.items)?;
            let ids: Vec<ItemId> = items
                .values()
                .filter(|i| predicate(i))
                .map(|i| i.item_id)
                .collect();
            for item_id in &ids {
                items.remove(item_id);
            }
            ids
        };
        if removed.is_empty() {
            return Ok(removed);
        }

        self.bookings.remove_where(|b| removed.contains(&b.item.item_id))?;
        self.comments.remove_where(|c| removed.contains(&c.item_id))?;
        Ok(removed)
    }

    /// 削除されたリクエストへの参照を外す（ON DELETE SET NULL に相当）
    pub(crate) fn clear_request_ids(&self, request_ids: &[ItemRequestId]) -> Result<()> {
        for item in lock(&self.items)?
            .values_mut()
            .filter(|i| i.request_id.is_some_and(|id| request_ids.contains(&id)))
        {
            item.request_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn insert(&self, item: Item) -> Result<()> {
        lock(&self.items)?.insert(item.item_id, item);
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<()> {
        let booked = BookedItem::from(&item);
        {
            let mut items = lock(&self.items)?;
            match items.get_mut(&item.item_id) {
                Some(existing) => *existing = item,
                None => return Err(format!("item {} does not exist", item.item_id).into()),
            }
        }
        self.bookings.refresh_item(&booked)
    }

    async fn get_by_id(&self, item_id: ItemId) -> Result<Option<Item>> {
        Ok(lock(&self.items)?.get(&item_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId, page: Page) -> Result<Vec<Item>> {
        let items: Vec<Item> = lock(&self.items)?
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(page.slice(&items))
    }

    async fn search_available(&self, text: &str, page: Page) -> Result<Vec<Item>> {
        let items: Vec<Item> = lock(&self.items)?
            .values()
            .filter(|i| matches_search(i, text))
            .cloned()
            .collect();
        Ok(page.slice(&items))
    }

    async fn find_by_request_ids(&self, request_ids: &[ItemRequestId]) -> Result<Vec<Item>> {
        Ok(lock(&self.items)?
            .values()
            .filter(|i| i.request_id.is_some_and(|id| request_ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn delete(&self, item_id: ItemId) -> Result<bool> {
        Ok(!self.remove_where(|i| i.item_id == item_id)?.is_empty())
    }
}
