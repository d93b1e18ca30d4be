use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::item::ItemDetails;
use crate::application::item_request::ItemRequestDetails;
use crate::domain::{
    Booking, Comment, Item, ItemPatch, ItemRequest, ItemRequestId, User, UserPatch,
};

fn default_state() -> String {
    "ALL".to_string()
}

fn default_from() -> i64 {
    0
}

fn default_size() -> i64 {
    20
}

fn default_request_size() -> i64 {
    10
}

// ============================================================================
// Query parameters
// ============================================================================

/// 予約一覧取得のクエリパラメータ（GET /bookings, GET /bookings/owner）
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_from")]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

impl ListBookingsQuery {
    /// `from` をページ番号に変換する
    ///
    /// 不正な値はそのまま渡し、検証はアプリケーション層のチェック順に任せる。
    pub fn page_index(&self) -> i64 {
        if self.size > 0 && self.from > 0 {
            self.from / self.size
        } else {
            self.from
        }
    }
}

/// 承認クエリ（PATCH /bookings/:id?approved=bool）
#[derive(Debug, Deserialize)]
pub struct ApprovalQuery {
    pub approved: bool,
}

/// ページングのみのクエリ（GET /items）
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_from")]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

/// 他ユーザーのリクエスト一覧のクエリ（GET /requests/all）
#[derive(Debug, Deserialize)]
pub struct RequestPageQuery {
    #[serde(default = "default_from")]
    pub from: i64,
    #[serde(default = "default_request_size")]
    pub size: i64,
}

/// アイテム検索のクエリ（GET /items/search）
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_from")]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// ユーザーの部分更新。省略したフィールドは変更しない。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            name: req.name,
            email: req.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequestBody {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
}

impl CreateItemRequestBody {
    pub fn request_id(&self) -> Option<ItemRequestId> {
        self.request_id.map(ItemRequestId::from_uuid)
    }
}

/// アイテムの部分更新。省略したフィールドは変更しない。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(req: UpdateItemRequest) -> Self {
        ItemPatch {
            name: req.name,
            description: req.description,
            available: req.available,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequestRequest {
    pub description: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.value(),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: Uuid,
    pub request_id: Option<Uuid>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.item_id.value(),
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id.value(),
            request_id: item.request_id.map(|id| id.value()),
        }
    }
}

/// アイテム詳細に付く予約の要約
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingShortResponse {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Booking> for BookingShortResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.booking_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.start,
            end: booking.end,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.comment_id.value(),
            text: comment.text,
            author_name: comment.author_name,
            created: comment.created_at,
        }
    }
}

/// アイテム詳細（GET /items/:id, GET /items）
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: Uuid,
    pub request_id: Option<Uuid>,
    pub last_booking: Option<BookingShortResponse>,
    pub next_booking: Option<BookingShortResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<ItemDetails> for ItemDetailsResponse {
    fn from(details: ItemDetails) -> Self {
        let item = ItemResponse::from(details.item);
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            last_booking: details.last_booking.map(BookingShortResponse::from),
            next_booking: details.next_booking.map(BookingShortResponse::from),
            comments: details
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookedItemResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookerResponse {
    pub id: Uuid,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub booker: BookerResponse,
    pub item: BookedItemResponse,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.booking_id.value(),
            start: booking.start,
            end: booking.end,
            status: booking.status.as_str().to_string(),
            booker: BookerResponse {
                id: booking.booker_id.value(),
            },
            item: BookedItemResponse {
                id: booking.item.item_id.value(),
                name: booking.item.name,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemRequestResponse {
    pub id: Uuid,
    pub description: String,
    pub requester_id: Uuid,
    pub created: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<ItemRequest> for ItemRequestResponse {
    fn from(request: ItemRequest) -> Self {
        Self {
            id: request.request_id.value(),
            description: request.description,
            requester_id: request.requester_id.value(),
            created: request.created_at,
            items: Vec::new(),
        }
    }
}

impl From<ItemRequestDetails> for ItemRequestResponse {
    fn from(details: ItemRequestDetails) -> Self {
        let mut response = ItemRequestResponse::from(details.request);
        response.items = details.items.into_iter().map(ItemResponse::from).collect();
        response
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
