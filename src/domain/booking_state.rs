use chrono::{DateTime, Utc};
use std::str::FromStr;

use super::{Booking, BookingStatus, UnknownState};

/// 予約の状態フィルタ（クエリ専用、永続化しない）
///
/// 境界で一度だけパースし、以降は閉じた列挙型として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// 時刻 `now` に固定した具体的な述語に変換する
    pub fn at(self, now: DateTime<Utc>) -> BookingFilter {
        match self {
            BookingState::All => BookingFilter::All,
            BookingState::Current => BookingFilter::Current(now),
            BookingState::Past => BookingFilter::Past(now),
            BookingState::Future => BookingFilter::Future(now),
            BookingState::Waiting => BookingFilter::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingFilter::Status(BookingStatus::Rejected),
        }
    }
}

/// 大文字小文字を区別した完全一致でパースする
impl FromStr for BookingState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

/// 予約に対する具体的な述語
///
/// | フィルタ | 述語 |
/// |---|---|
/// | All | 制限なし |
/// | Current | start < now < end |
/// | Past | end < now |
/// | Future | start > now |
/// | Status | status = 指定値（時刻は無視） |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    All,
    Current(DateTime<Utc>),
    Past(DateTime<Utc>),
    Future(DateTime<Utc>),
    Status(BookingStatus),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            BookingFilter::All => true,
            BookingFilter::Current(now) => booking.start < now && now < booking.end,
            BookingFilter::Past(now) => booking.end < now,
            BookingFilter::Future(now) => booking.start > now,
            BookingFilter::Status(status) => booking.status == status,
        }
    }
}

/// 結果の並び順：開始時刻の降順（フィルタによらず常に同じ）
///
/// 開始時刻が同じ場合は予約IDの降順で安定させる。
pub fn newest_start_first(a: &Booking, b: &Booking) -> std::cmp::Ordering {
    b.start
        .cmp(&a.start)
        .then_with(|| b.booking_id.cmp(&a.booking_id))
}
