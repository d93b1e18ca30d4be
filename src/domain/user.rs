use serde::{Deserialize, Serialize};

use super::{UserError, UserId};

/// ユーザー
///
/// アイテム・予約・コメントから参照されるが、所有はされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// ユーザーの部分更新
///
/// 各フィールドは独立に「指定あり / 指定なし」を持つ。
/// `None` は「変更しない」を意味し、値のクリアは表現できない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn validate_name(name: &str) -> Result<(), UserError> {
    if name.trim().is_empty() {
        return Err(UserError::BlankName);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(UserError::InvalidEmail);
    }
    Ok(())
}

/// 純粋関数：ユーザーを登録する
pub fn register_user(name: String, email: String) -> Result<User, UserError> {
    validate_name(&name)?;
    validate_email(&email)?;

    Ok(User {
        user_id: UserId::new(),
        name,
        email,
    })
}

/// 純粋関数：部分更新を適用する
///
/// 指定されたフィールドだけを登録時と同じルールで検証し、上書きする。
pub fn apply_patch(user: User, patch: UserPatch) -> Result<User, UserError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }

    Ok(User {
        name: patch.name.unwrap_or(user.name),
        email: patch.email.unwrap_or(user.email),
        ..user
    })
}
