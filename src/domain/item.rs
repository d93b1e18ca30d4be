use serde::{Deserialize, Serialize};

use super::{ItemError, ItemId, ItemRequestId, UserId};

/// アイテム集約 - オーナーが貸し出す物品
///
/// `available` が false の間は新しい予約を受け付けない。
/// 予約の作成・承認によって自動的には切り替わらない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    /// このアイテムが応えたリクエスト
    pub request_id: Option<ItemRequestId>,
}

/// アイテムの部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

fn validate_name(name: &str) -> Result<(), ItemError> {
    if name.trim().is_empty() {
        return Err(ItemError::BlankName);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ItemError> {
    if description.trim().is_empty() {
        return Err(ItemError::BlankDescription);
    }
    Ok(())
}

/// 純粋関数：アイテムを出品する
pub fn list_item(
    owner_id: UserId,
    name: String,
    description: String,
    available: bool,
    request_id: Option<ItemRequestId>,
) -> Result<Item, ItemError> {
    validate_name(&name)?;
    validate_description(&description)?;

    Ok(Item {
        item_id: ItemId::new(),
        name,
        description,
        available,
        owner_id,
        request_id,
    })
}

/// 純粋関数：部分更新を適用する
pub fn apply_patch(item: Item, patch: ItemPatch) -> Result<Item, ItemError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }

    Ok(Item {
        name: patch.name.unwrap_or(item.name),
        description: patch.description.unwrap_or(item.description),
        available: patch.available.unwrap_or(item.available),
        ..item
    })
}

/// 検索語がアイテムに一致するか（名前または説明の部分一致、大文字小文字を区別しない）
///
/// 貸出可能なアイテムのみ一致する。
pub fn matches_search(item: &Item, text: &str) -> bool {
    let needle = text.to_lowercase();
    item.available
        && (item.name.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill(owner_id: UserId) -> Item {
        list_item(
            owner_id,
            "Drill".to_string(),
            "Cordless power drill".to_string(),
            true,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_list_item_success() {
        let owner_id = UserId::new();
        let item = drill(owner_id);
        assert_eq!(item.owner_id, owner_id);
        assert!(item.available);
        assert_eq!(item.request_id, None);
    }

    #[test]
    fn test_list_item_rejects_blank_name() {
        let result = list_item(UserId::new(), "".to_string(), "desc".to_string(), true, None);
        assert_eq!(result.unwrap_err(), ItemError::BlankName);
    }

    #[test]
    fn test_list_item_rejects_blank_description() {
        let result = list_item(UserId::new(), "Drill".to_string(), " ".to_string(), true, None);
        assert_eq!(result.unwrap_err(), ItemError::BlankDescription);
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let item = drill(UserId::new());
        let patch = ItemPatch {
            available: Some(false),
            ..ItemPatch::default()
        };

        let updated = apply_patch(item.clone(), patch).unwrap();
        assert!(!updated.available);
        assert_eq!(updated.name, item.name);
        assert_eq!(updated.description, item.description);
        assert_eq!(updated.owner_id, item.owner_id);
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let item = drill(UserId::new());
        assert!(matches_search(&item, "dRiLl"));
        assert!(matches_search(&item, "cordless"));
        assert!(!matches_search(&item, "hammer"));
    }

    #[test]
    fn test_matches_search_skips_unavailable_items() {
        let mut item = drill(UserId::new());
        item.available = false;
        assert!(!matches_search(&item, "drill"));
    }
}
