use crate::domain::{self, Booking, Comment, Item, ItemId, Page, UserId, commands::*};

use super::availability::annotate;
use crate::application::{
    ApplicationError, Result, ServiceDependencies, ensure_user_exists, load_item,
};

/// アイテム詳細（GET /items/:id, GET /items 用）
///
/// 直近・次の予約はオーナーが見た場合のみ埋まる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
    pub comments: Vec<Comment>,
}

/// アイテムに予約情報とコメントを付けて詳細を組み立てるヘルパー関数
async fn build_details(
    deps: &ServiceDependencies,
    item: Item,
    requesting_user_id: UserId,
) -> Result<ItemDetails> {
    let annotation = annotate(deps, &item, requesting_user_id).await?;

    let comments = deps
        .comment_repository
        .find_by_item(item.item_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(ItemDetails {
        item,
        last_booking: annotation.last_booking,
        next_booking: annotation.next_booking,
        comments,
    })
}

/// アイテムを出品する
///
/// ビジネスルール：
/// - オーナーが存在すること（NotFound）
/// - リクエストを参照する場合、そのリクエストが存在すること（NotFound）
/// - 名前・説明が空でないこと（InvalidInput）
pub async fn create_item(deps: &ServiceDependencies, cmd: CreateItem) -> Result<Item> {
    ensure_user_exists(deps, cmd.owner_id).await?;

    if let Some(request_id) = cmd.request_id {
        let exists = deps
            .item_request_repository
            .exists(request_id)
            .await
            .map_err(ApplicationError::RepositoryError)?;

        if !exists {
            return Err(ApplicationError::NotFound(format!(
                "Item request {} not found",
                request_id
            )));
        }
    }

    let item = domain::item::list_item(
        cmd.owner_id,
        cmd.name,
        cmd.description,
        cmd.available,
        cmd.request_id,
    )?;

    deps.item_repository
        .insert(item.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(item_id = %item.item_id, owner_id = %item.owner_id, "item created");

    Ok(item)
}

/// アイテムを部分更新する
///
/// 指定されたフィールドだけを上書きする。オーナー以外は更新できない（Forbidden）。
pub async fn update_item(deps: &ServiceDependencies, cmd: UpdateItem) -> Result<Item> {
    let item = load_item(deps, cmd.item_id).await?;

    if item.owner_id != cmd.user_id {
        return Err(ApplicationError::Forbidden(format!(
            "User {} is not the owner of item {}",
            cmd.user_id, cmd.item_id
        )));
    }

    let updated = domain::item::apply_patch(item, cmd.patch)?;

    deps.item_repository
        .update(updated.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(item_id = %updated.item_id, "item updated");

    Ok(updated)
}

/// アイテムを取得する
///
/// 呼び出し元がオーナーの場合のみ直近・次の予約が付く。
pub async fn get_item(
    deps: &ServiceDependencies,
    item_id: ItemId,
    requesting_user_id: UserId,
) -> Result<ItemDetails> {
    let item = load_item(deps, item_id).await?;
    build_details(deps, item, requesting_user_id).await
}

/// オーナーのアイテム一覧を取得する（ID昇順）
///
/// 呼び出し元はオーナー本人なので、すべてのアイテムに予約情報が付く。
pub async fn list_owner_items(
    deps: &ServiceDependencies,
    owner_id: UserId,
    page: Page,
) -> Result<Vec<ItemDetails>> {
    ensure_user_exists(deps, owner_id).await?;

    let items = deps
        .item_repository
        .find_by_owner(owner_id, page)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    let mut details = Vec::with_capacity(items.len());
    for item in items {
        details.push(build_details(deps, item, owner_id).await?);
    }

    Ok(details)
}

/// 貸出可能なアイテムを検索する
///
/// 検索語が空白のみの場合はストアに問い合わせず空を返す。
pub async fn search_items(deps: &ServiceDependencies, text: &str, page: Page) -> Result<Vec<Item>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    deps.item_repository
        .search_available(text, page)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// アイテムを削除する
///
/// オーナー以外は削除できない（Forbidden）。
pub async fn delete_item(deps: &ServiceDependencies, user_id: UserId, item_id: ItemId) -> Result<()> {
    let item = load_item(deps, item_id).await?;

    if item.owner_id != user_id {
        return Err(ApplicationError::Forbidden(format!(
            "User {} is not the owner of item {}",
            user_id, item_id
        )));
    }

    deps.item_repository
        .delete(item_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(item_id = %item_id, "item deleted");

    Ok(())
}
