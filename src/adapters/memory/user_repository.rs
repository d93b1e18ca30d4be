use crate::domain::{User, UserId};
use crate::ports::UniqueViolation;
use crate::ports::user_repository::{Result, UserRepository as UserRepositoryTrait};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::booking_repository::BookingRepository;
use super::comment_repository::CommentRepository;
use super::item_repository::ItemRepository;
use super::item_request_repository::ItemRequestRepository;
use super::lock;

/// UserRepositoryのインメモリ実装
///
/// IDは時系列順なので、BTreeMapの順序がそのまま作成順になる。
/// ユーザーを削除すると、所有アイテム・予約・コメント・リクエストも削除する。
pub struct UserRepository {
    users: Mutex<BTreeMap<UserId, User>>,
    items: Arc<ItemRepository>,
    bookings: Arc<BookingRepository>,
    comments: Arc<CommentRepository>,
    requests: Arc<ItemRequestRepository>,
}

impl UserRepository {
    pub fn new(
        items: Arc<ItemRepository>,
        bookings: Arc<BookingRepository>,
        comments: Arc<CommentRepository>,
        requests: Arc<ItemRequestRepository>,
    ) -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            items,
            bookings,
            comments,
            requests,
        }
    }
}

/// users.email の一意インデックスに相当する検査
fn ensure_unique_email(users: &BTreeMap<UserId, User>, user: &User) -> Result<()> {
    if users
        .values()
        .any(|u| u.email == user.email && u.user_id != user.user_id)
    {
        return Err(UniqueViolation(format!("email {} already exists", user.email)).into());
    }
    Ok(())
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert(&self, user: User) -> Result<()> {
        let mut users = lock(&self.users)?;
        ensure_unique_email(&users, &user)?;
        users.insert(user.user_id, user);
        Ok(())
    }

    async fn update(&self, user: User) -> Result<()> {
        let mut users = lock(&self.users)?;
        ensure_unique_email(&users, &user)?;
        match users.get_mut(&user.user_id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(format!("user {} does not exist", user.user_id).into()),
        }
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(lock(&self.users)?.get(&user_id).cloned())
    }

    async fn exists(&self, user_id: UserId) -> Result<bool> {
        Ok(lock(&self.users)?.contains_key(&user_id))
    }

    async fn email_taken(&self, email: &str, except: Option<UserId>) -> Result<bool> {
        Ok(lock(&self.users)?
            .values()
            .any(|u| u.email == email && Some(u.user_id) != except))
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(lock(&self.users)?.values().cloned().collect())
    }

    async fn delete(&self, user_id: UserId) -> Result<bool> {
        if lock(&self.users)?.remove(&user_id).is_none() {
            return Ok(false);
        }

        self.items.remove_where(|i| i.owner_id == user_id)?;
        self.bookings.remove_where(|b| b.booker_id == user_id)?;
        self.comments.remove_where(|c| c.author_id == user_id)?;
        let requests = self.requests.remove_where(|r| r.requester_id == user_id)?;
        self.items.clear_request_ids(&requests)?;
        Ok(true)
    }
}
