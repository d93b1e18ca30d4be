use crate::application::ApplicationError;
use crate::domain::PageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Application(ApplicationError),
    /// `X-Sharer-User-Id` ヘッダーがない、またはUUIDでない
    MissingUserId,
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::Application(err.into())
    }
}

impl ApiError {
    /// ステータスコード・エラー種別・メッセージに分解する
    fn parts(self) -> (StatusCode, &'static str, String) {
        let err = match self {
            ApiError::MissingUserId => {
                return (
                    StatusCode::BAD_REQUEST,
                    "MISSING_USER_ID",
                    "X-Sharer-User-Id header with a valid id is required".to_string(),
                );
            }
            ApiError::Application(err) => err,
        };

        match err {
            ApplicationError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApplicationError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApplicationError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
            ApplicationError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "INVALID_STATE", msg),
            ApplicationError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),

            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApplicationError::RepositoryError(e) => {
                tracing::error!("Repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();
        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
