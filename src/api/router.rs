use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_comment, create_booking, create_item, create_item_request, create_user,
    delete_item, delete_user, get_booking, get_item, get_item_request, get_user, list_bookings,
    list_other_requests, list_own_requests, list_owner_bookings, list_owner_items, list_users,
    search_items, set_approval, update_item, update_user,
};

/// APIルーターを作成する
///
/// 呼び出し元のユーザーは `X-Sharer-User-Id` ヘッダーで渡す（/users 以外）。
///
/// - /users: 登録・一覧・取得・部分更新・削除
/// - /items: 出品・自分のアイテム一覧・検索・詳細・部分更新・削除・コメント
/// - /bookings: 予約・承認/却下・取得・状態フィルタ付き一覧（予約者／オーナー）
/// - /requests: リクエストの作成・自分の一覧・他ユーザーの一覧・取得
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Users
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // Items
        .route("/items", post(create_item).get(list_owner_items))
        .route("/items/search", get(search_items))
        .route(
            "/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/items/:id/comment", post(add_comment))
        // Bookings
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/owner", get(list_owner_bookings))
        .route("/bookings/:id", get(get_booking).patch(set_approval))
        // Item requests
        .route("/requests", post(create_item_request).get(list_own_requests))
        .route("/requests/all", get(list_other_requests))
        .route("/requests/:id", get(get_item_request))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
