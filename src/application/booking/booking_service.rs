use crate::domain::{self, Booking, BookingId, BookingStatus, UserId, commands::*};

use crate::application::{
    ApplicationError, Result, ServiceDependencies, ensure_user_exists, load_item,
};

/// 予約を取得するヘルパー関数
async fn load_booking(deps: &ServiceDependencies, booking_id: BookingId) -> Result<Booking> {
    deps.booking_repository
        .get_by_id(booking_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or_else(|| ApplicationError::NotFound(format!("Booking {} not found", booking_id)))
}

/// アイテムを予約する
///
/// ビジネスルール：
/// - 予約者が存在すること（NotFound）
/// - アイテムが存在すること（NotFound）
/// - アイテムが貸出可能であること（InvalidState）
/// - 予約者がアイテムのオーナーでないこと（Forbidden）
/// - 開始・終了がともに未来で、終了が開始より後であること（InvalidInput）
///
/// 作成された予約はWAITING。アイテムの貸出可否は変更しない。
///
/// # 戻り値
/// 保存された予約（生成されたIDを含む）
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. 予約者の存在確認
    ensure_user_exists(deps, cmd.booker_id).await?;

    // 2. アイテムの取得
    let item = load_item(deps, cmd.item_id).await?;

    // 3. ドメイン層の純粋関数で検証・生成
    let booking = domain::booking::create_booking(
        cmd.booker_id,
        &item,
        cmd.start,
        cmd.end,
        cmd.requested_at,
    )
    .inspect_err(|e| {
        tracing::debug!(item_id = %cmd.item_id, booker_id = %cmd.booker_id, "booking rejected: {}", e)
    })?;

    // 4. 保存
    deps.booking_repository
        .insert(booking.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(
        booking_id = %booking.booking_id,
        item_id = %item.item_id,
        booker_id = %booking.booker_id,
        "booking created"
    );

    Ok(booking)
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 予約が存在すること（NotFound）
/// - ステータスがWAITINGであること（InvalidState）
/// - 呼び出し元がアイテムのオーナーであること（Forbidden）
///
/// ステータスの更新はWAITINGであることを条件に行うため、
/// 同じ予約への同時承認は片方だけが成功し、もう片方はInvalidStateになる。
pub async fn set_approval(deps: &ServiceDependencies, cmd: SetApproval) -> Result<Booking> {
    // 1. 予約の取得
    let booking = load_booking(deps, cmd.booking_id).await?;

    // 2. ドメイン層の純粋関数で遷移を検証
    let decided = domain::booking::decide(booking, cmd.owner_id, cmd.approved)?;

    // 3. 条件付き更新
    let updated = deps
        .booking_repository
        .update_status(cmd.booking_id, BookingStatus::Waiting, decided.status)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !updated {
        // 読み込み後に別のリクエストが判定した
        return Err(domain::ApprovalError::AlreadyDecided.into());
    }

    tracing::info!(
        booking_id = %cmd.booking_id,
        status = decided.status.as_str(),
        "booking decided"
    );

    Ok(decided)
}

/// 予約を1件取得する
///
/// ビジネスルール：
/// - 呼び出し元が存在すること（NotFound）
/// - 予約が存在すること（NotFound）
/// - 呼び出し元が予約者またはアイテムのオーナーであること（Forbidden）
pub async fn get_booking(
    deps: &ServiceDependencies,
    user_id: UserId,
    booking_id: BookingId,
) -> Result<Booking> {
    ensure_user_exists(deps, user_id).await?;

    let booking = load_booking(deps, booking_id).await?;

    if !domain::booking::can_view(&booking, user_id) {
        return Err(ApplicationError::Forbidden(format!(
            "User {} has no access to booking {}",
            user_id, booking_id
        )));
    }

    Ok(booking)
}
