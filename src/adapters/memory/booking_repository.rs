use crate::domain::{
    BookedItem, Booking, BookingFilter, BookingId, BookingStatus, ItemId, Page, UserId,
    booking_state::newest_start_first,
};
use crate::ports::booking_repository::{
    BookingRepository as BookingRepositoryTrait, EndOrder, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;

/// BookingRepositoryのインメモリ実装
///
/// 状態フィルタはドメインの `BookingFilter::matches` をそのまま使う。
pub struct BookingRepository {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl BookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }

    /// 条件に合う予約を開始時刻の降順でページングする
    fn select(
        &self,
        predicate: impl Fn(&Booking) -> bool,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = lock(&self.bookings)?
            .values()
            .filter(|b| predicate(b) && filter.matches(b))
            .cloned()
            .collect();
        bookings.sort_by(newest_start_first);
        Ok(page.slice(&bookings))
    }

    /// 条件に合う予約を削除する（bookingsテーブルの ON DELETE CASCADE に相当）
    pub(crate) fn remove_where(&self, predicate: impl Fn(&Booking) -> bool) -> Result<()> {
        lock(&self.bookings)?.retain(|_, b| !predicate(b));
        Ok(())
    }

    /// アイテムの変更を予約が持つアイテム情報に反映する
    pub(crate) fn refresh_item(&self, item: &BookedItem) -> Result<()> {
        for booking in lock(&self.bookings)?
            .values_mut()
            .filter(|b| b.item.item_id == item.item_id)
        {
            booking.item = item.clone();
        }
        Ok(())
    }
}

impl Default for BookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn insert(&self, booking: Booking) -> Result<()> {
        lock(&self.bookings)?.insert(booking.booking_id, booking);
        Ok(())
    }

    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(lock(&self.bookings)?.get(&booking_id).cloned())
    }

    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool> {
        let mut bookings = lock(&self.bookings)?;
        match bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == expected => {
                booking.status = new_status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        self.select(|b| b.booker_id == booker_id, filter, page)
    }

    async fn find_by_item_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        self.select(|b| b.item.owner_id == owner_id, filter, page)
    }

    async fn find_first_by_item_and_status(
        &self,
        item_id: ItemId,
        status: BookingStatus,
        order: EndOrder,
    ) -> Result<Option<Booking>> {
        let bookings = lock(&self.bookings)?;
        let candidates = bookings
            .values()
            .filter(|b| b.item.item_id == item_id && b.status == status);

        let found = match order {
            EndOrder::Ascending => candidates.min_by_key(|b| (b.end, b.booking_id)),
            EndOrder::Descending => candidates.max_by_key(|b| (b.end, b.booking_id)),
        };
        Ok(found.cloned())
    }

    async fn find_first_started(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        status: BookingStatus,
        started_before: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        Ok(lock(&self.bookings)?
            .values()
            .filter(|b| {
                b.booker_id == booker_id
                    && b.item.item_id == item_id
                    && b.status == status
                    && b.start < started_before
            })
            .min_by_key(|b| (b.start, b.booking_id))
            .cloned())
    }
}
