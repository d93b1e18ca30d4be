pub mod booking;
mod errors;
pub mod item;
pub mod item_request;
pub mod user;

pub use errors::{ApplicationError, Result};

use crate::domain::{Item, ItemId, User, UserId};
use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// 振る舞いは持たず、サービス関数に引数として渡すデータ構造。
/// すべての依存が明示的になり、テストでは任意のアダプターを差し込める。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub item_repository: Arc<dyn ItemRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub comment_repository: Arc<dyn CommentRepository>,
    pub item_request_repository: Arc<dyn ItemRequestRepository>,
}

/// ユーザーの存在を確認するヘルパー関数
///
/// # エラー
/// - NotFound: ユーザーが存在しない
pub(crate) async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_repository
        .exists(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !exists {
        return Err(ApplicationError::NotFound(format!(
            "User {} not found",
            user_id
        )));
    }
    Ok(())
}

/// ユーザーを取得するヘルパー関数
pub(crate) async fn load_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    deps.user_repository
        .get_by_id(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or_else(|| ApplicationError::NotFound(format!("User {} not found", user_id)))
}

/// アイテムを取得するヘルパー関数
pub(crate) async fn load_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<Item> {
    deps.item_repository
        .get_by_id(item_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or_else(|| ApplicationError::NotFound(format!("Item {} not found", item_id)))
}
