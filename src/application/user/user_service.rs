use crate::domain::{self, User, UserId, commands::*};

use crate::application::{ApplicationError, Result, ServiceDependencies, load_user};
use crate::ports::UniqueViolation;

fn email_conflict(email: &str) -> ApplicationError {
    ApplicationError::Conflict(format!("Email {} is already registered", email))
}

/// 書き込み時の一意制約違反を Conflict に変換する
///
/// 事前チェックと書き込みの間に同じメールアドレスが登録された場合に発生する。
fn map_write_error(
    error: Box<dyn std::error::Error + Send + Sync>,
    email: &str,
) -> ApplicationError {
    if error.is::<UniqueViolation>() {
        email_conflict(email)
    } else {
        ApplicationError::RepositoryError(error)
    }
}

/// メールアドレスの重複を確認するヘルパー関数
async fn ensure_email_free(
    deps: &ServiceDependencies,
    email: &str,
    except: Option<UserId>,
) -> Result<()> {
    let taken = deps
        .user_repository
        .email_taken(email, except)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if taken {
        return Err(email_conflict(email));
    }
    Ok(())
}

/// ユーザーを登録する
///
/// ビジネスルール：
/// - 名前が空でないこと、メールアドレスが '@' を含むこと（InvalidInput）
/// - メールアドレスが一意であること（Conflict）
pub async fn register_user(deps: &ServiceDependencies, cmd: RegisterUser) -> Result<User> {
    let user = domain::user::register_user(cmd.name, cmd.email)?;

    ensure_email_free(deps, &user.email, None).await?;

    deps.user_repository
        .insert(user.clone())
        .await
        .map_err(|e| map_write_error(e, &user.email))?;

    tracing::info!(user_id = %user.user_id, "user registered");

    Ok(user)
}

pub async fn get_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    load_user(deps, user_id).await
}

pub async fn list_users(deps: &ServiceDependencies) -> Result<Vec<User>> {
    deps.user_repository
        .find_all()
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// ユーザーを部分更新する
///
/// 指定されたフィールドのみ検証・上書きする。
/// メールアドレスを変更する場合は一意性も確認する。
pub async fn update_user(deps: &ServiceDependencies, cmd: UpdateUser) -> Result<User> {
    let user = load_user(deps, cmd.user_id).await?;

    let updated = domain::user::apply_patch(user, cmd.patch)?;

    ensure_email_free(deps, &updated.email, Some(updated.user_id)).await?;

    deps.user_repository
        .update(updated.clone())
        .await
        .map_err(|e| map_write_error(e, &updated.email))?;

    tracing::info!(user_id = %updated.user_id, "user updated");

    Ok(updated)
}

/// ユーザーを削除する
pub async fn delete_user(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let deleted = deps
        .user_repository
        .delete(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::NotFound(format!(
            "User {} not found",
            user_id
        )));
    }

    tracing::info!(user_id = %user_id, "user deleted");

    Ok(())
}
