use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, ItemId, Page, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = super::PortResult<T>;

/// 終了時刻での並び順（単一結果の検索用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOrder {
    Ascending,
    Descending,
}

/// 予約リポジトリポート
///
/// 一覧系の検索はすべて開始時刻の降順で返す。
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<()>;

    /// アイテム名・オーナーを含めた予約を取得する
    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// ステータスを条件付きで更新する（compare-and-swap）
    ///
    /// 現在のステータスが `expected` の場合のみ `new_status` に更新し true を返す。
    /// 同時に承認された場合、後勝ちではなく片方だけが成功する。
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool>;

    /// 予約者として持つ予約をフィルタして返す
    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>>;

    /// 自分のアイテムに対する予約をフィルタして返す
    async fn find_by_item_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>>;

    /// アイテムとステータスで絞り込み、終了時刻順で最初の1件を返す
    async fn find_first_by_item_and_status(
        &self,
        item_id: ItemId,
        status: BookingStatus,
        order: EndOrder,
    ) -> Result<Option<Booking>>;

    /// 予約者・アイテム・ステータスが一致し、開始が `started_before` より前の1件を返す
    ///
    /// コメント資格の確認に使用される。
    async fn find_first_started(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        status: BookingStatus,
        started_before: DateTime<Utc>,
    ) -> Result<Option<Booking>>;
}
