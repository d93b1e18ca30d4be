//! `Mutex` で保護したインメモリのリポジトリ実装
//!
//! テストと `SHAREIT_STORAGE=memory` での起動に使用する。プロセスを終了すると消える。

pub mod booking_repository;
pub mod comment_repository;
pub mod item_repository;
pub mod item_request_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository as InMemoryBookingRepository;
pub use comment_repository::CommentRepository as InMemoryCommentRepository;
pub use item_repository::ItemRepository as InMemoryItemRepository;
pub use item_request_repository::ItemRequestRepository as InMemoryItemRequestRepository;
pub use user_repository::UserRepository as InMemoryUserRepository;

use crate::application::ServiceDependencies;
use crate::ports::PortResult;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> PortResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| "in-memory store lock poisoned".into())
}

/// すべてのリポジトリをインメモリ実装で揃えた依存関係を作る
///
/// 削除時の連鎖はマイグレーションの外部キー制約と同じ範囲で行う。
pub fn service_dependencies() -> ServiceDependencies {
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let requests = Arc::new(InMemoryItemRequestRepository::new());
    let items = Arc::new(InMemoryItemRepository::new(bookings.clone(), comments.clone()));
    let users = Arc::new(InMemoryUserRepository::new(
        items.clone(),
        bookings.clone(),
        comments.clone(),
        requests.clone(),
    ));

    ServiceDependencies {
        user_repository: users,
        item_repository: items,
        booking_repository: bookings,
        comment_repository: comments,
        item_request_repository: requests,
    }
}
