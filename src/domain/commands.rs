use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, ItemPatch, ItemRequestId, UserId, UserPatch};

/// コマンド：アイテムを予約する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を承認または却下する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetApproval {
    pub owner_id: UserId,
    pub booking_id: BookingId,
    pub approved: bool,
}

/// クエリ：予約一覧を取得する
///
/// `state` は未検証のトークン。`now` は呼び出し1回につき1度だけ取得した時刻。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookings {
    pub user_id: UserId,
    pub state: String,
    pub page_index: i64,
    pub page_size: i64,
    pub now: DateTime<Utc>,
}

/// コマンド：ユーザーを登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
}

/// コマンド：ユーザーを部分更新する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub patch: UserPatch,
}

/// コマンド：アイテムを出品する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<ItemRequestId>,
}

/// コマンド：アイテムを部分更新する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub patch: ItemPatch,
}

/// コマンド：アイテムにコメントする
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddComment {
    pub author_id: UserId,
    pub item_id: ItemId,
    pub text: String,
    pub written_at: DateTime<Utc>,
}

/// コマンド：アイテムリクエストを作成する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub requester_id: UserId,
    pub description: String,
    pub requested_at: DateTime<Utc>,
}
