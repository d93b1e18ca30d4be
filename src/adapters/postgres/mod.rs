pub mod booking_repository;
pub mod comment_repository;
pub mod item_repository;
pub mod item_request_repository;
pub mod user_repository;

// パブリックに型を再エクスポート
pub use booking_repository::BookingRepository as PostgresBookingRepository;
pub use comment_repository::CommentRepository as PostgresCommentRepository;
pub use item_repository::ItemRepository as PostgresItemRepository;
pub use item_request_repository::ItemRequestRepository as PostgresItemRequestRepository;
pub use user_repository::UserRepository as PostgresUserRepository;

use crate::application::ServiceDependencies;
use sqlx::PgPool;
use std::sync::Arc;

/// すべてのリポジトリをPostgreSQL実装で揃えた依存関係を作る
pub fn service_dependencies(pool: PgPool) -> ServiceDependencies {
    ServiceDependencies {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        item_repository: Arc::new(PostgresItemRepository::new(pool.clone())),
        booking_repository: Arc::new(PostgresBookingRepository::new(pool.clone())),
        comment_repository: Arc::new(PostgresCommentRepository::new(pool.clone())),
        item_request_repository: Arc::new(PostgresItemRequestRepository::new(pool)),
    }
}
