use crate::domain::{Booking, BookingState, Page, commands::ListBookings};

use crate::application::{ApplicationError, Result, ServiceDependencies, ensure_user_exists};

/// 一覧取得の共通前処理
///
/// チェック順：ユーザーの存在 → 状態フィルタ → ページ指定。
/// 状態フィルタはここで一度だけパースされ、以降は列挙型として扱われる。
async fn prepare(deps: &ServiceDependencies, query: &ListBookings) -> Result<(BookingState, Page)> {
    ensure_user_exists(deps, query.user_id).await?;

    let state: BookingState = query.state.parse()?;
    let page = Page::new(query.page_index, query.page_size)?;

    Ok((state, page))
}

/// 予約者として持つ予約を状態フィルタで絞り込んで返す
///
/// 結果は常に開始時刻の降順。`query.now` に対して評価するため、
/// 1回の呼び出しの中で「現在」はぶれない。
///
/// # エラー
/// - NotFound: ユーザーが存在しない
/// - InvalidInput: 未知の状態フィルタ（"Unknown state: <token>"）、負のページ番号、0以下のページサイズ
pub async fn list_by_booker(deps: &ServiceDependencies, query: ListBookings) -> Result<Vec<Booking>> {
    let (state, page) = prepare(deps, &query).await?;

    tracing::debug!(
        user_id = %query.user_id,
        state = state.as_str(),
        page = page.index(),
        size = page.size(),
        "listing bookings by booker"
    );

    deps.booking_repository
        .find_by_booker(query.user_id, state.at(query.now), page)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// 自分のアイテムに対する予約を状態フィルタで絞り込んで返す
///
/// 並び順・エラーは `list_by_booker` と同じ。
pub async fn list_by_owner(deps: &ServiceDependencies, query: ListBookings) -> Result<Vec<Booking>> {
    let (state, page) = prepare(deps, &query).await?;

    tracing::debug!(
        user_id = %query.user_id,
        state = state.as_str(),
        page = page.index(),
        size = page.size(),
        "listing bookings by item owner"
    );

    deps.booking_repository
        .find_by_item_owner(query.user_id, state.at(query.now), page)
        .await
        .map_err(ApplicationError::RepositoryError)
}
