use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemRequestError, ItemRequestId, UserId};

/// カタログにまだないアイテムの募集
///
/// そのリクエストを参照するアイテムが出品されると受動的に満たされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub request_id: ItemRequestId,
    pub description: String,
    pub requester_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：リクエストを作成する
pub fn open_request(
    requester_id: UserId,
    description: String,
    now: DateTime<Utc>,
) -> Result<ItemRequest, ItemRequestError> {
    if description.trim().is_empty() {
        return Err(ItemRequestError::BlankDescription);
    }

    Ok(ItemRequest {
        request_id: ItemRequestId::new(),
        description,
        requester_id,
        created_at: now,
    })
}
