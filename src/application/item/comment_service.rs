use crate::domain::{self, Comment, commands::AddComment};

use super::availability::can_comment;
use crate::application::{ApplicationError, Result, ServiceDependencies, load_item, load_user};

/// アイテムにコメントする
///
/// ビジネスルール（チェック順）：
/// - 本文が空でないこと（InvalidInput）
/// - ユーザー・アイテムが存在すること（NotFound）
/// - ユーザーがそのアイテムを実際に利用したこと：承認済みで開始済みの予約がある（InvalidState）
pub async fn add_comment(deps: &ServiceDependencies, cmd: AddComment) -> Result<Comment> {
    if cmd.text.trim().is_empty() {
        return Err(domain::CommentError::BlankText.into());
    }

    let author = load_user(deps, cmd.author_id).await?;
    let item = load_item(deps, cmd.item_id).await?;

    if !can_comment(deps, author.user_id, item.item_id, cmd.written_at).await? {
        tracing::debug!(
            user_id = %author.user_id,
            item_id = %item.item_id,
            "comment rejected: no completed booking"
        );
        return Err(ApplicationError::InvalidState(format!(
            "Item {} has not yet been used by user {}",
            item.item_id, author.user_id
        )));
    }

    let comment = domain::comment::write_comment(&author, item.item_id, cmd.text, cmd.written_at)?;

    deps.comment_repository
        .insert(comment.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(comment_id = %comment.comment_id, item_id = %item.item_id, "comment added");

    Ok(comment)
}
