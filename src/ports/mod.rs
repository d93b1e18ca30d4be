#[allow(unused_imports)]
pub mod booking_repository;
#[allow(unused_imports)]
pub mod comment_repository;
#[allow(unused_imports)]
pub mod item_repository;
#[allow(unused_imports)]
pub mod item_request_repository;
#[allow(unused_imports)]
pub mod user_repository;

pub use booking_repository::*;
pub use comment_repository::*;
pub use item_repository::*;
pub use item_request_repository::*;
pub use user_repository::*;

/// ポート共通のResult型
///
/// アダプター固有のエラーはボックス化して上位に渡す。
pub type PortResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 一意制約違反
///
/// アダプターは書き込みが一意制約に反したときにこのエラーを返す。
/// サービス層はこれを `Conflict` として扱う。
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);
