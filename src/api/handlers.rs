use crate::application::{ServiceDependencies, booking, item, item_request, user};
use crate::domain::{
    BookingId, ItemId, ItemRequestId, Page, UserId,
    commands::{
        AddComment, CreateBooking, CreateItem, CreateItemRequest, ListBookings, RegisterUser,
        SetApproval, UpdateItem, UpdateUser,
    },
};
use axum::{
    Json, async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        ApprovalQuery, BookingResponse, CommentResponse, CreateBookingRequest,
        CreateCommentRequest, CreateItemRequestBody, CreateItemRequestRequest, CreateUserRequest,
        ItemDetailsResponse, ItemRequestResponse, ItemResponse, ListBookingsQuery, PageQuery,
        RequestPageQuery, SearchQuery, UpdateItemRequest, UpdateUserRequest, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// 呼び出し元ユーザーのヘッダー名
pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// `X-Sharer-User-Id` ヘッダーから取り出した呼び出し元のID
#[derive(Debug, Clone, Copy)]
pub struct SharerUserId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(|uuid| SharerUserId(UserId::from_uuid(uuid)))
            .ok_or(ApiError::MissingUserId)
    }
}

// ============================================================================
// Users
// ============================================================================

/// POST /users - ユーザーを登録
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    tracing::info!("POST /users");

    let cmd = RegisterUser {
        name: req.name,
        email: req.email,
    };
    let user = user::register_user(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users - 全ユーザーを取得
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    tracing::info!("GET /users");

    let users = user::list_users(&state.service_deps).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/:id - ユーザーを取得
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!(user_id = %user_id, "GET /users/:id");

    let user = user::get_user(&state.service_deps, UserId::from_uuid(user_id)).await?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/:id - ユーザーを部分更新
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!(user_id = %user_id, "PATCH /users/:id");

    let cmd = UpdateUser {
        user_id: UserId::from_uuid(user_id),
        patch: req.into(),
    };
    let user = user::update_user(&state.service_deps, cmd).await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id - ユーザーを削除
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(user_id = %user_id, "DELETE /users/:id");

    user::delete_user(&state.service_deps, UserId::from_uuid(user_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Items
// ============================================================================

/// POST /items - アイテムを出品
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    Json(req): Json<CreateItemRequestBody>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    tracing::info!(owner_id = %owner_id, "POST /items");

    let cmd = CreateItem {
        owner_id,
        request_id: req.request_id(),
        name: req.name,
        description: req.description,
        available: req.available,
    };
    let item = item::create_item(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /items - 自分のアイテム一覧（予約情報付き）
pub async fn list_owner_items(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemDetailsResponse>>, ApiError> {
    tracing::info!(owner_id = %owner_id, "GET /items");

    let page = Page::from_offset(query.from, query.size)?;
    let items = item::list_owner_items(&state.service_deps, owner_id, page).await?;

    Ok(Json(
        items.into_iter().map(ItemDetailsResponse::from).collect(),
    ))
}

/// GET /items/search?text= - 貸出可能なアイテムを検索
pub async fn search_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    tracing::info!(text = %query.text, "GET /items/search");

    let page = Page::from_offset(query.from, query.size)?;
    let items = item::search_items(&state.service_deps, &query.text, page).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/:id - アイテム詳細
///
/// 直近・次の予約は呼び出し元がオーナーの場合のみ付く。
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemDetailsResponse>, ApiError> {
    tracing::info!(item_id = %item_id, user_id = %user_id, "GET /items/:id");

    let details = item::get_item(&state.service_deps, ItemId::from_uuid(item_id), user_id).await?;

    Ok(Json(ItemDetailsResponse::from(details)))
}

/// PATCH /items/:id - アイテムを部分更新（オーナーのみ）
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    tracing::info!(item_id = %item_id, user_id = %user_id, "PATCH /items/:id");

    let cmd = UpdateItem {
        user_id,
        item_id: ItemId::from_uuid(item_id),
        patch: req.into(),
    };
    let item = item::update_item(&state.service_deps, cmd).await?;

    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /items/:id - アイテムを削除（オーナーのみ）
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(item_id = %item_id, user_id = %user_id, "DELETE /items/:id");

    item::delete_item(&state.service_deps, user_id, ItemId::from_uuid(item_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /items/:id/comment - コメントを投稿
///
/// 承認済みで開始済みの予約を持つユーザーのみ投稿できる。
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    SharerUserId(author_id): SharerUserId,
    Path(item_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    tracing::info!(item_id = %item_id, author_id = %author_id, "POST /items/:id/comment");

    let cmd = AddComment {
        author_id,
        item_id: ItemId::from_uuid(item_id),
        text: req.text,
        written_at: Utc::now(),
    };
    let comment = item::add_comment(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

// ============================================================================
// Bookings
// ============================================================================

/// POST /bookings - 予約を作成
///
/// 強制されるビジネスルール:
/// - 予約者とアイテムが存在すること
/// - アイテムが貸出可能であること
/// - オーナー自身の予約でないこと
/// - 期間が未来かつ開始 < 終了であること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(booker_id): SharerUserId,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    tracing::info!(booker_id = %booker_id, item_id = %req.item_id, "POST /bookings");

    let cmd = CreateBooking {
        booker_id,
        item_id: ItemId::from_uuid(req.item_id),
        start: req.start,
        end: req.end,
        requested_at: Utc::now(),
    };
    let booking = booking::create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved=bool - 予約を承認または却下（オーナーのみ）
pub async fn set_approval(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<ApprovalQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    tracing::info!(
        booking_id = %booking_id,
        owner_id = %owner_id,
        approved = query.approved,
        "PATCH /bookings/:id"
    );

    let cmd = SetApproval {
        owner_id,
        booking_id: BookingId::from_uuid(booking_id),
        approved: query.approved,
    };
    let booking = booking::set_approval(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings/:id - 予約を取得（予約者またはオーナーのみ）
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    tracing::info!(booking_id = %booking_id, user_id = %user_id, "GET /bookings/:id");

    let booking =
        booking::get_booking(&state.service_deps, user_id, BookingId::from_uuid(booking_id))
            .await?;

    Ok(Json(BookingResponse::from(booking)))
}

fn list_query(user_id: UserId, query: ListBookingsQuery) -> ListBookings {
    ListBookings {
        user_id,
        page_index: query.page_index(),
        page_size: query.size,
        state: query.state,
        now: Utc::now(),
    }
}

/// GET /bookings?state=&from=&size= - 予約者として持つ予約一覧
///
/// stateの既定値はALL。結果は開始時刻の降順。
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    tracing::info!(user_id = %user_id, state = %query.state, "GET /bookings");

    let bookings =
        booking::list_by_booker(&state.service_deps, list_query(user_id, query)).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner?state=&from=&size= - 自分のアイテムに対する予約一覧
pub async fn list_owner_bookings(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    tracing::info!(user_id = %user_id, state = %query.state, "GET /bookings/owner");

    let bookings = booking::list_by_owner(&state.service_deps, list_query(user_id, query)).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// ============================================================================
// Item requests
// ============================================================================

/// POST /requests - アイテムリクエストを作成
pub async fn create_item_request(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
    Json(req): Json<CreateItemRequestRequest>,
) -> Result<(StatusCode, Json<ItemRequestResponse>), ApiError> {
    tracing::info!(requester_id = %requester_id, "POST /requests");

    let cmd = CreateItemRequest {
        requester_id,
        description: req.description,
        requested_at: Utc::now(),
    };
    let request = item_request::create_item_request(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(ItemRequestResponse::from(request))))
}

/// GET /requests - 自分のリクエスト一覧
pub async fn list_own_requests(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    tracing::info!(user_id = %user_id, "GET /requests");

    let requests = item_request::list_own_requests(&state.service_deps, user_id).await?;

    Ok(Json(
        requests.into_iter().map(ItemRequestResponse::from).collect(),
    ))
}

/// GET /requests/all?from=&size= - 他のユーザーのリクエスト一覧
pub async fn list_other_requests(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<RequestPageQuery>,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    tracing::info!(user_id = %user_id, "GET /requests/all");

    let page = Page::from_offset(query.from, query.size)?;
    let requests = item_request::list_other_requests(&state.service_deps, user_id, page).await?;

    Ok(Json(
        requests.into_iter().map(ItemRequestResponse::from).collect(),
    ))
}

/// GET /requests/:id - リクエストを取得
pub async fn get_item_request(
    State(state): State<Arc<AppState>>,
    SharerUserId(user_id): SharerUserId,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ItemRequestResponse>, ApiError> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "GET /requests/:id");

    let details = item_request::get_item_request(
        &state.service_deps,
        user_id,
        ItemRequestId::from_uuid(request_id),
    )
    .await?;

    Ok(Json(ItemRequestResponse::from(details)))
}
