use crate::domain::{ItemRequest, ItemRequestId, Page, UserId};
use crate::ports::item_request_repository::{
    ItemRequestRepository as ItemRequestRepositoryTrait, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_request(row: &PgRow) -> Result<ItemRequest> {
    Ok(ItemRequest {
        request_id: ItemRequestId::from_uuid(row.try_get("request_id")?),
        description: row.try_get("description")?,
        requester_id: UserId::from_uuid(row.try_get("requester_id")?),
        created_at: row.try_get("created_at")?,
    })
}

/// ItemRequestRepositoryのPostgreSQL実装
pub struct ItemRequestRepository {
    pool: PgPool,
}

impl ItemRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRequestRepositoryTrait for ItemRequestRepository {
    async fn insert(&self, request: ItemRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO item_requests (request_id, description, requester_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.request_id.value())
        .bind(&request.description)
        .bind(request.requester_id.value())
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>> {
        let row = sqlx::query(
            r#"
            SELECT request_id, description, requester_id, created_at
            FROM item_requests
            WHERE request_id = $1
            "#,
        )
        .bind(request_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_request).transpose()
    }

    async fn exists(&self, request_id: ItemRequestId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM item_requests WHERE request_id = $1)",
        )
        .bind(request_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT request_id, description, requester_id, created_at
            FROM item_requests
            WHERE requester_id = $1
            ORDER BY created_at DESC, request_id DESC
            "#,
        )
        .bind(requester_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_request).collect()
    }

    async fn find_by_other_requesters(
        &self,
        requester_id: UserId,
        page: Page,
    ) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT request_id, description, requester_id, created_at
            FROM item_requests
            WHERE requester_id <> $1
            ORDER BY created_at DESC, request_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(requester_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_request).collect()
    }
}
