use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentError, CommentId, ItemId, User, UserId};

/// アイテムへのコメント（レビュー）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：コメントを書く
///
/// 利用実績の確認はアプリケーション層で行う。ここでは本文のみ検証する。
pub fn write_comment(
    author: &User,
    item_id: ItemId,
    text: String,
    now: DateTime<Utc>,
) -> Result<Comment, CommentError> {
    if text.trim().is_empty() {
        return Err(CommentError::BlankText);
    }

    Ok(Comment {
        comment_id: CommentId::new(),
        item_id,
        author_id: author.user_id,
        author_name: author.name.clone(),
        text,
        created_at: now,
    })
}
