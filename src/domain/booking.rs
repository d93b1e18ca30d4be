use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ApprovalError, BookingId, CreateBookingError, Item, ItemId, UserId};

/// 予約ステータス
///
/// 状態遷移：WAITING → {APPROVED, REJECTED}（どちらも終端）。
/// CANCELED はフィルタ用の分類として存在するが、到達する遷移はない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 予約されたアイテムの参照
///
/// オーナー判定と表示に必要な分だけを持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedItem {
    pub item_id: ItemId,
    pub name: String,
    pub owner_id: UserId,
}

impl From<&Item> for BookedItem {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.item_id,
            name: item.name.clone(),
            owner_id: item.owner_id,
        }
    }
}

/// 予約
///
/// 不変条件：start < end。
/// 閲覧は予約者とオーナー、ステータス変更はオーナーのみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker_id: UserId,
    pub item: BookedItem,
}

/// 純粋関数：予約を作成する
///
/// ビジネスルール：
/// - アイテムが貸出可能であること
/// - 予約者がアイテムのオーナーでないこと
/// - 開始・終了がともに `now` より後で、終了が開始より後であること
///
/// 作成された予約はWAITING。アイテムの貸出可否は変更しない。
pub fn create_booking(
    booker_id: UserId,
    item: &Item,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Booking, CreateBookingError> {
    if !item.available {
        return Err(CreateBookingError::ItemNotAvailable);
    }

    if item.owner_id == booker_id {
        return Err(CreateBookingError::OwnerCannotBook);
    }

    if !is_valid_period(start, end, now) {
        return Err(CreateBookingError::InvalidPeriod);
    }

    Ok(Booking {
        booking_id: BookingId::new(),
        start,
        end,
        status: BookingStatus::Waiting,
        booker_id,
        item: BookedItem::from(item),
    })
}

/// 予約期間の検証
///
/// 3つの条件のどれに違反しても同じ結果になる。
pub fn is_valid_period(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start > now && end > now && end > start
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - ステータスがWAITINGであること（判定済みの予約は再判定できない）
/// - 判定者がアイテムのオーナーであること
pub fn decide(
    booking: Booking,
    decided_by: UserId,
    approved: bool,
) -> Result<Booking, ApprovalError> {
    if booking.status != BookingStatus::Waiting {
        return Err(ApprovalError::AlreadyDecided);
    }

    if booking.item.owner_id != decided_by {
        return Err(ApprovalError::NotItemOwner);
    }

    let status = if approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking { status, ..booking })
}

/// 予約を閲覧できるか（予約者またはオーナー）
pub fn can_view(booking: &Booking, user_id: UserId) -> bool {
    booking.booker_id == user_id || booking.item.owner_id == user_id
}

/// コメント資格のある予約か
///
/// 承認済みで、開始が `now` より前であること。
pub fn qualifies_for_comment(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Approved && booking.start < now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn available_item(owner_id: UserId) -> Item {
        Item {
            item_id: ItemId::new(),
            name: "Ladder".to_string(),
            description: "Aluminium ladder".to_string(),
            available: true,
            owner_id,
            request_id: None,
        }
    }

    #[test]
    fn test_create_booking_is_waiting() {
        let now = Utc::now();
        let owner_id = UserId::new();
        let booker_id = UserId::new();
        let item = available_item(owner_id);

        let booking = create_booking(
            booker_id,
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        )
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Waiting);
        assert_eq!(booking.booker_id, booker_id);
        assert_eq!(booking.item.item_id, item.item_id);
        assert_eq!(booking.item.owner_id, owner_id);
    }

    #[test]
    fn test_create_booking_fails_when_item_unavailable() {
        let now = Utc::now();
        let mut item = available_item(UserId::new());
        item.available = false;

        let result = create_booking(
            UserId::new(),
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        );
        assert_eq!(result.unwrap_err(), CreateBookingError::ItemNotAvailable);
    }

    #[test]
    fn test_create_booking_fails_for_owner() {
        let now = Utc::now();
        let owner_id = UserId::new();
        let item = available_item(owner_id);

        let result = create_booking(
            owner_id,
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        );
        assert_eq!(result.unwrap_err(), CreateBookingError::OwnerCannotBook);
    }

    #[test]
    fn test_create_booking_rejects_every_bad_period() {
        let now = Utc::now();
        let item = available_item(UserId::new());
        let booker_id = UserId::new();

        let cases = [
            // 開始が過去
            (now - Duration::hours(1), now + Duration::days(1)),
            // 終了が過去
            (now + Duration::days(1), now - Duration::hours(1)),
            // 終了が開始より前
            (now + Duration::days(2), now + Duration::days(1)),
            // 開始と終了が同じ
            (now + Duration::days(1), now + Duration::days(1)),
            // 開始がちょうど現在
            (now, now + Duration::days(1)),
        ];

        for (start, end) in cases {
            let result = create_booking(booker_id, &item, start, end, now);
            assert_eq!(result.unwrap_err(), CreateBookingError::InvalidPeriod);
        }
    }

    #[test]
    fn test_decide_approve_and_reject() {
        let now = Utc::now();
        let owner_id = UserId::new();
        let item = available_item(owner_id);
        let booking = create_booking(
            UserId::new(),
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        )
        .unwrap();

        let approved = decide(booking.clone(), owner_id, true).unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let rejected = decide(booking, owner_id, false).unwrap();
        assert_eq!(rejected.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_decide_twice_fails() {
        let now = Utc::now();
        let owner_id = UserId::new();
        let item = available_item(owner_id);
        let booking = create_booking(
            UserId::new(),
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        )
        .unwrap();

        let approved = decide(booking, owner_id, true).unwrap();
        assert_eq!(
            decide(approved.clone(), owner_id, true).unwrap_err(),
            ApprovalError::AlreadyDecided
        );
        assert_eq!(
            decide(approved, owner_id, false).unwrap_err(),
            ApprovalError::AlreadyDecided
        );
    }

    #[test]
    fn test_decide_by_non_owner_fails() {
        let now = Utc::now();
        let booker_id = UserId::new();
        let item = available_item(UserId::new());
        let booking = create_booking(
            booker_id,
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        )
        .unwrap();

        // 予約者本人でも承認はできない
        assert_eq!(
            decide(booking.clone(), booker_id, true).unwrap_err(),
            ApprovalError::NotItemOwner
        );
        assert_eq!(
            decide(booking, UserId::new(), true).unwrap_err(),
            ApprovalError::NotItemOwner
        );
    }

    #[test]
    fn test_can_view() {
        let now = Utc::now();
        let owner_id = UserId::new();
        let booker_id = UserId::new();
        let item = available_item(owner_id);
        let booking = create_booking(
            booker_id,
            &item,
            now + Duration::days(1),
            now + Duration::days(2),
            now,
        )
        .unwrap();

        assert!(can_view(&booking, owner_id));
        assert!(can_view(&booking, booker_id));
        assert!(!can_view(&booking, UserId::new()));
    }

    #[test]
    fn test_qualifies_for_comment() {
        let now = Utc::now();
        let item = available_item(UserId::new());
        let booking = Booking {
            booking_id: BookingId::new(),
            start: now - Duration::days(2),
            end: now + Duration::days(1),
            status: BookingStatus::Approved,
            booker_id: UserId::new(),
            item: BookedItem::from(&item),
        };

        assert!(qualifies_for_comment(&booking, now));

        let waiting = Booking {
            status: BookingStatus::Waiting,
            ..booking.clone()
        };
        assert!(!qualifies_for_comment(&waiting, now));

        let future = Booking {
            start: now + Duration::hours(1),
            ..booking
        };
        assert!(!qualifies_for_comment(&future, now));
    }

    #[test]
    fn test_booking_status_round_trip_through_str() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("waiting".parse::<BookingStatus>().is_err());
    }
}
