use crate::domain::{
    BookedItem, Booking, BookingFilter, BookingId, BookingStatus, ItemId, Page, UserId,
};
use crate::ports::booking_repository::{
    BookingRepository as BookingRepositoryTrait, EndOrder, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::str::FromStr;

/// 予約とアイテム（名前・オーナー）を結合して取得する共通SELECT
const SELECT_BOOKINGS: &str = r#"
    SELECT
        b.booking_id,
        b.start_at,
        b.end_at,
        b.status,
        b.booker_id,
        b.item_id,
        i.name AS item_name,
        i.owner_id AS item_owner_id
    FROM bookings b
    JOIN items i ON i.item_id = b.item_id
"#;

/// PostgreSQLの行データをBookingに変換する
///
/// statusの文字列からの変換に失敗した場合はエラーを返す。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.try_get("status")?;
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.try_get("booking_id")?),
        start: row.try_get("start_at")?,
        end: row.try_get("end_at")?,
        status,
        booker_id: UserId::from_uuid(row.try_get("booker_id")?),
        item: BookedItem {
            item_id: ItemId::from_uuid(row.try_get("item_id")?),
            name: row.try_get("item_name")?,
            owner_id: UserId::from_uuid(row.try_get("item_owner_id")?),
        },
    })
}

/// 状態フィルタをWHERE句の条件として追加する
fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: BookingFilter) {
    match filter {
        BookingFilter::All => {}
        BookingFilter::Current(now) => {
            query.push(" AND b.start_at < ");
            query.push_bind(now);
            query.push(" AND b.end_at > ");
            query.push_bind(now);
        }
        BookingFilter::Past(now) => {
            query.push(" AND b.end_at < ");
            query.push_bind(now);
        }
        BookingFilter::Future(now) => {
            query.push(" AND b.start_at > ");
            query.push_bind(now);
        }
        BookingFilter::Status(status) => {
            query.push(" AND b.status = ");
            query.push_bind(status.as_str());
        }
    }
}

/// 並び順（開始時刻の降順）とページを追加する
fn push_page(query: &mut QueryBuilder<'_, Postgres>, page: Page) {
    query.push(" ORDER BY b.start_at DESC, b.booking_id DESC LIMIT ");
    query.push_bind(page.limit());
    query.push(" OFFSET ");
    query.push_bind(page.offset());
}

/// BookingRepositoryのPostgreSQL実装
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `column = id` で絞り込んだ上で状態フィルタとページを適用する
    async fn find_filtered(
        &self,
        column: &'static str,
        user_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_BOOKINGS);
        query.push(" WHERE ");
        query.push(column);
        query.push(" = ");
        query.push_bind(user_id.value());
        push_filter(&mut query, filter);
        push_page(&mut query, page);

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter().map(map_row_to_booking).collect()
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn insert(&self, booking: Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (booking_id, start_at, end_at, status, item_id, booker_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking.booking_id.value())
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.status.as_str())
        .bind(booking.item.item_id.value())
        .bind(booking.booker_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("{SELECT_BOOKINGS} WHERE b.booking_id = $1"))
            .bind(booking_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 現在のステータスを条件にしたUPDATEで、同時承認の競合を防ぐ
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $3
            WHERE booking_id = $1 AND status = $2
            "#,
        )
        .bind(booking_id.value())
        .bind(expected.as_str())
        .bind(new_status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        self.find_filtered("b.booker_id", booker_id, filter, page)
            .await
    }

    async fn find_by_item_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>> {
        self.find_filtered("i.owner_id", owner_id, filter, page)
            .await
    }

    async fn find_first_by_item_and_status(
        &self,
        item_id: ItemId,
        status: BookingStatus,
        order: EndOrder,
    ) -> Result<Option<Booking>> {
        let order_by = match order {
            EndOrder::Ascending => "b.end_at ASC, b.booking_id ASC",
            EndOrder::Descending => "b.end_at DESC, b.booking_id DESC",
        };

        let row = sqlx::query(&format!(
            "{SELECT_BOOKINGS} WHERE b.item_id = $1 AND b.status = $2 ORDER BY {order_by} LIMIT 1"
        ))
        .bind(item_id.value())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_first_started(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        status: BookingStatus,
        started_before: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "{SELECT_BOOKINGS} WHERE b.booker_id = $1 AND b.item_id = $2 AND b.status = $3 \
             AND b.start_at < $4 ORDER BY b.start_at ASC LIMIT 1"
        ))
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(status.as_str())
        .bind(started_before)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }
}
