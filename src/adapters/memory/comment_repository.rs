use crate::domain::{Comment, ItemId};
use crate::ports::comment_repository::{CommentRepository as CommentRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// CommentRepositoryのインメモリ実装
pub struct CommentRepository {
    comments: Mutex<Vec<Comment>>,
}

impl CommentRepository {
    pub fn new() -> Self {
        Self {
            comments: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn remove_where(&self, predicate: impl Fn(&Comment) -> bool) -> Result<()> {
        lock(&self.comments)?.retain(|c| !predicate(c));
        Ok(())
    }
}

impl Default for CommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepositoryTrait for CommentRepository {
    async fn insert(&self, comment: Comment) -> Result<()> {
        lock(&self.comments)?.push(comment);
        Ok(())
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = lock(&self.comments)?
            .iter()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.comment_id));
        Ok(comments)
    }
}
