use crate::domain::{self, Item, ItemRequest, ItemRequestId, Page, UserId, commands::*};

use crate::application::{ApplicationError, Result, ServiceDependencies, ensure_user_exists};

/// リクエストと、それに応えて出品されたアイテム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequestDetails {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}

/// リクエストごとに応答アイテムを紐付けるヘルパー関数
///
/// アイテムは1回の問い合わせでまとめて取得する。
async fn attach_items(
    deps: &ServiceDependencies,
    requests: Vec<ItemRequest>,
) -> Result<Vec<ItemRequestDetails>> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<ItemRequestId> = requests.iter().map(|r| r.request_id).collect();
    let items = deps
        .item_repository
        .find_by_request_ids(&ids)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(requests
        .into_iter()
        .map(|request| {
            let items = items
                .iter()
                .filter(|item| item.request_id == Some(request.request_id))
                .cloned()
                .collect();
            ItemRequestDetails { request, items }
        })
        .collect())
}

/// アイテムリクエストを作成する
///
/// ビジネスルール：
/// - ユーザーが存在すること（NotFound）
/// - 説明が空でないこと（InvalidInput）
pub async fn create_item_request(
    deps: &ServiceDependencies,
    cmd: CreateItemRequest,
) -> Result<ItemRequest> {
    ensure_user_exists(deps, cmd.requester_id).await?;

    let request =
        domain::item_request::open_request(cmd.requester_id, cmd.description, cmd.requested_at)?;

    deps.item_request_repository
        .insert(request.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(request_id = %request.request_id, "item request created");

    Ok(request)
}

/// 自分のリクエストを新しい順に取得する
pub async fn list_own_requests(
    deps: &ServiceDependencies,
    user_id: UserId,
) -> Result<Vec<ItemRequestDetails>> {
    ensure_user_exists(deps, user_id).await?;

    let requests = deps
        .item_request_repository
        .find_by_requester(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    attach_items(deps, requests).await
}

/// 他のユーザーのリクエストを新しい順にページングして取得する
pub async fn list_other_requests(
    deps: &ServiceDependencies,
    user_id: UserId,
    page: Page,
) -> Result<Vec<ItemRequestDetails>> {
    ensure_user_exists(deps, user_id).await?;

    let requests = deps
        .item_request_repository
        .find_by_other_requesters(user_id, page)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    attach_items(deps, requests).await
}

/// リクエストを1件取得する
pub async fn get_item_request(
    deps: &ServiceDependencies,
    user_id: UserId,
    request_id: ItemRequestId,
) -> Result<ItemRequestDetails> {
    ensure_user_exists(deps, user_id).await?;

    let request = deps
        .item_request_repository
        .get_by_id(request_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or_else(|| {
            ApplicationError::NotFound(format!("Item request {} not found", request_id))
        })?;

    let mut details = attach_items(deps, vec![request]).await?;
    details
        .pop()
        .ok_or_else(|| ApplicationError::NotFound(format!("Item request {} not found", request_id)))
}
