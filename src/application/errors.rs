use thiserror::Error;

use crate::domain::{
    ApprovalError, CommentError, CreateBookingError, ItemError, ItemRequestError, PageError,
    UnknownState, UserError,
};

/// アプリケーション層のエラー
///
/// すべての失敗は違反した時点で即座に返され、書き込みは検証がすべて通ってから行う。
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 参照されたユーザー・アイテム・予約・リクエストが存在しない
    #[error("{0}")]
    NotFound(String),

    /// 呼び出し元に操作の権限がない
    #[error("{0}")]
    Forbidden(String),

    /// 入力値が不正（日付の順序、ページ指定、状態フィルタなど）
    #[error("{0}")]
    InvalidInput(String),

    /// 対象の現在の状態では操作できない
    #[error("{0}")]
    InvalidState(String),

    /// 一意制約に違反する（メールアドレスの重複）
    #[error("{0}")]
    Conflict(String),

    /// リポジトリのエラー
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;

impl From<CreateBookingError> for ApplicationError {
    fn from(err: CreateBookingError) -> Self {
        match err {
            CreateBookingError::ItemNotAvailable => {
                ApplicationError::InvalidState(err.to_string())
            }
            CreateBookingError::OwnerCannotBook => ApplicationError::Forbidden(err.to_string()),
            CreateBookingError::InvalidPeriod => ApplicationError::InvalidInput(err.to_string()),
        }
    }
}

impl From<ApprovalError> for ApplicationError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::AlreadyDecided => ApplicationError::InvalidState(err.to_string()),
            ApprovalError::NotItemOwner => ApplicationError::Forbidden(err.to_string()),
        }
    }
}

impl From<UnknownState> for ApplicationError {
    fn from(err: UnknownState) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<PageError> for ApplicationError {
    fn from(err: PageError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<UserError> for ApplicationError {
    fn from(err: UserError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<ItemError> for ApplicationError {
    fn from(err: ItemError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<CommentError> for ApplicationError {
    fn from(err: CommentError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<ItemRequestError> for ApplicationError {
    fn from(err: ItemRequestError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}
