use crate::domain::{Item, ItemId, ItemRequestId, Page, UserId};
use crate::ports::item_repository::{ItemRepository as ItemRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

fn map_row_to_item(row: &PgRow) -> Result<Item> {
    let request_id: Option<Uuid> = row.try_get("request_id")?;

    Ok(Item {
        item_id: ItemId::from_uuid(row.try_get("item_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        available: row.try_get("available")?,
        owner_id: UserId::from_uuid(row.try_get("owner_id")?),
        request_id: request_id.map(ItemRequestId::from_uuid),
    })
}

/// LIKE パターンのメタ文字をエスケープする
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// ItemRepositoryのPostgreSQL実装
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn insert(&self, item: Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (item_id, name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.item_id.value())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.owner_id.value())
        .bind(item.request_id.map(|id| id.value()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, item: Item) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, available = $4
            WHERE item_id = $1
            "#,
        )
        .bind(item.item_id.value())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_item).transpose()
    }

    async fn find_by_owner(&self, owner_id: UserId, page: Page) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE owner_id = $1
            ORDER BY item_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_item).collect()
    }

    async fn search_available(&self, text: &str, page: Page) -> Result<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(text));

        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE available
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY item_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_item).collect()
    }

    async fn find_by_request_ids(&self, request_ids: &[ItemRequestId]) -> Result<Vec<Item>> {
        let ids: Vec<Uuid> = request_ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE request_id = ANY($1)
            ORDER BY item_id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_item).collect()
    }

    async fn delete(&self, item_id: ItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
