use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingStatus, Item, ItemId, UserId};
use crate::ports::EndOrder;

use crate::application::{ApplicationError, Result, ServiceDependencies};

/// アイテムの「直近の予約」「次の予約」
///
/// オーナーにだけ表示される読み取り専用の射影。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingAnnotation {
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
}

/// アイテムに直近・次の予約を付与する
///
/// - 呼び出し元がオーナーの場合：承認済み予約のうち、終了時刻が最も早いものを
///   `last_booking`、最も遅いものを `next_booking` とする（2回の独立した単一結果検索）
/// - オーナー以外：予約の有無にかかわらず両方とも `None`
///
/// 注意：どちらも「現在」を基準にしていない。従来の挙動との互換のため
/// この非対称な検索をそのまま維持している（DESIGN.md 参照）。
pub async fn annotate(
    deps: &ServiceDependencies,
    item: &Item,
    requesting_user_id: UserId,
) -> Result<BookingAnnotation> {
    if item.owner_id != requesting_user_id {
        return Ok(BookingAnnotation::default());
    }

    let last_booking = deps
        .booking_repository
        .find_first_by_item_and_status(item.item_id, BookingStatus::Approved, EndOrder::Ascending)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    let next_booking = deps
        .booking_repository
        .find_first_by_item_and_status(item.item_id, BookingStatus::Approved, EndOrder::Descending)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(BookingAnnotation {
        last_booking,
        next_booking,
    })
}

/// ユーザーがアイテムにコメントできるか
///
/// そのユーザーによる承認済みの予約で、開始が `now` より前のものが存在する場合のみ true。
pub async fn can_comment(
    deps: &ServiceDependencies,
    user_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<bool> {
    let booking = deps
        .booking_repository
        .find_first_started(user_id, item_id, BookingStatus::Approved, now)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(booking.is_some_and(|b| crate::domain::booking::qualifies_for_comment(&b, now)))
}
