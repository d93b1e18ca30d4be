use async_trait::async_trait;
use chrono::{Duration, Utc};
use shareit::adapters::memory;
use shareit::application::{ApplicationError, booking, item, item_request, user};
use shareit::domain::commands::*;
use shareit::domain::*;
use shareit::ports::{PortResult, UserRepository};
use std::sync::Arc;

mod common;

use common::{insert_booking, list_item, register};

fn comment_cmd(author_id: UserId, item_id: ItemId, text: &str) -> AddComment {
    AddComment {
        author_id,
        item_id,
        text: text.to_string(),
        written_at: Utc::now(),
    }
}

fn page(index: i64, size: i64) -> Page {
    Page::new(index, size).unwrap()
}

fn all_bookings(user_id: UserId) -> ListBookings {
    ListBookings {
        user_id,
        state: "ALL".to_string(),
        page_index: 0,
        page_size: 20,
        now: Utc::now(),
    }
}

/// 重複チェックをすり抜けるユーザーリポジトリ
///
/// 事前チェックの後に別のリクエストが同じメールアドレスを登録した状況を再現する。
struct StaleCheckUserRepository {
    inner: Arc<dyn UserRepository>,
}

#[async_trait]
impl UserRepository for StaleCheckUserRepository {
    async fn insert(&self, user: User) -> PortResult<()> {
        self.inner.insert(user).await
    }

    async fn update(&self, user: User) -> PortResult<()> {
        self.inner.update(user).await
    }

    async fn get_by_id(&self, user_id: UserId) -> PortResult<Option<User>> {
        self.inner.get_by_id(user_id).await
    }

    async fn exists(&self, user_id: UserId) -> PortResult<bool> {
        self.inner.exists(user_id).await
    }

    async fn email_taken(&self, _email: &str, _except: Option<UserId>) -> PortResult<bool> {
        Ok(false)
    }

    async fn find_all(&self) -> PortResult<Vec<User>> {
        self.inner.find_all().await
    }

    async fn delete(&self, user_id: UserId) -> PortResult<bool> {
        self.inner.delete(user_id).await
    }
}

// ============================================================================
// ユーザー
// ============================================================================

#[tokio::test]
async fn test_register_user_duplicate_email_is_conflict() {
    let deps = memory::service_dependencies();
    register(&deps, "Alice").await;

    let result = user::register_user(
        &deps,
        RegisterUser {
            name: "Another Alice".to_string(),
            email: "alice@example.com".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(ApplicationError::Conflict(_))));
}

#[tokio::test]
async fn test_register_user_invalid_email_is_invalid_input() {
    let deps = memory::service_dependencies();

    let result = user::register_user(
        &deps,
        RegisterUser {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    assert!(user::list_users(&deps).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user_partial_fields() {
    let deps = memory::service_dependencies();
    let alice = register(&deps, "Alice").await;

    let updated = user::update_user(
        &deps,
        UpdateUser {
            user_id: alice.user_id,
            patch: UserPatch {
                name: Some("Alicia".to_string()),
                email: None,
            },
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, alice.email);

    // 自分のメールアドレスを指定しても重複扱いにならない
    let same_email = user::update_user(
        &deps,
        UpdateUser {
            user_id: alice.user_id,
            patch: UserPatch {
                name: None,
                email: Some(alice.email.clone()),
            },
        },
    )
    .await;
    assert!(same_email.is_ok());
}

#[tokio::test]
async fn test_update_user_to_taken_email_is_conflict() {
    let deps = memory::service_dependencies();
    let alice = register(&deps, "Alice").await;
    let bob = register(&deps, "Bob").await;

    let result = user::update_user(
        &deps,
        UpdateUser {
            user_id: bob.user_id,
            patch: UserPatch {
                name: None,
                email: Some(alice.email),
            },
        },
    )
    .await;

    assert!(matches!(result, Err(ApplicationError::Conflict(_))));
}

#[tokio::test]
async fn test_duplicate_email_missed_by_check_is_conflict_on_write() {
    let mut deps = memory::service_dependencies();
    deps.user_repository = Arc::new(StaleCheckUserRepository {
        inner: deps.user_repository.clone(),
    });
    let alice = register(&deps, "Alice").await;
    let bob = register(&deps, "Bob").await;

    let registered = user::register_user(
        &deps,
        RegisterUser {
            name: "Another Alice".to_string(),
            email: "alice@example.com".to_string(),
        },
    )
    .await;
    assert!(matches!(registered, Err(ApplicationError::Conflict(_))));

    let updated = user::update_user(
        &deps,
        UpdateUser {
            user_id: bob.user_id,
            patch: UserPatch {
                email: Some(alice.email.clone()),
                ..UserPatch::default()
            },
        },
    )
    .await;
    assert!(matches!(updated, Err(ApplicationError::Conflict(_))));
}

#[tokio::test]
async fn test_get_and_delete_user() {
    let deps = memory::service_dependencies();
    let alice = register(&deps, "Alice").await;

    assert_eq!(user::get_user(&deps, alice.user_id).await.unwrap(), alice);

    user::delete_user(&deps, alice.user_id).await.unwrap();

    assert!(matches!(
        user::get_user(&deps, alice.user_id).await,
        Err(ApplicationError::NotFound(_))
    ));
    assert!(matches!(
        user::delete_user(&deps, alice.user_id).await,
        Err(ApplicationError::NotFound(_))
    ));
}

// ============================================================================
// アイテム
// ============================================================================

#[tokio::test]
async fn test_create_item_for_unknown_owner_is_not_found() {
    let deps = memory::service_dependencies();

    let result = item::create_item(
        &deps,
        CreateItem {
            owner_id: UserId::new(),
            name: "Drill".to_string(),
            description: "Cordless".to_string(),
            available: true,
            request_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn test_create_item_with_unknown_request_is_not_found() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;

    let result = item::create_item(
        &deps,
        CreateItem {
            owner_id: owner.user_id,
            name: "Drill".to_string(),
            description: "Cordless".to_string(),
            available: true,
            request_id: Some(ItemRequestId::new()),
        },
    )
    .await;

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn test_update_item_only_by_owner() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let stranger = register(&deps, "Bob").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;

    let forbidden = item::update_item(
        &deps,
        UpdateItem {
            user_id: stranger.user_id,
            item_id: drill.item_id,
            patch: ItemPatch {
                available: Some(false),
                ..ItemPatch::default()
            },
        },
    )
    .await;
    assert!(matches!(forbidden, Err(ApplicationError::Forbidden(_))));

    let updated = item::update_item(
        &deps,
        UpdateItem {
            user_id: owner.user_id,
            item_id: drill.item_id,
            patch: ItemPatch {
                available: Some(false),
                ..ItemPatch::default()
            },
        },
    )
    .await
    .unwrap();
    assert!(!updated.available);
    assert_eq!(updated.name, drill.name);
}

#[tokio::test]
async fn test_search_items_matches_available_items_case_insensitively() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let drill = list_item(&deps, owner.user_id, "Power Drill", true).await;
    list_item(&deps, owner.user_id, "Old Drill", false).await;
    list_item(&deps, owner.user_id, "Tent", true).await;

    let found = item::search_items(&deps, "dRiLl", page(0, 20)).await.unwrap();
    assert_eq!(found, vec![drill]);

    let blank = item::search_items(&deps, "   ", page(0, 20)).await.unwrap();
    assert!(blank.is_empty());
}

#[tokio::test]
async fn test_delete_item_only_by_owner() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let stranger = register(&deps, "Bob").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;

    let forbidden = item::delete_item(&deps, stranger.user_id, drill.item_id).await;
    assert!(matches!(forbidden, Err(ApplicationError::Forbidden(_))));

    item::delete_item(&deps, owner.user_id, drill.item_id).await.unwrap();

    let gone = item::get_item(&deps, drill.item_id, owner.user_id).await;
    assert!(matches!(gone, Err(ApplicationError::NotFound(_))));
}

// ============================================================================
// 直近・次の予約
// ============================================================================

#[tokio::test]
async fn test_annotation_only_for_owner() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let booker = register(&deps, "Bob").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;
    let now = Utc::now();

    let earlier = insert_booking(
        &deps,
        booker.user_id,
        &drill,
        now - Duration::days(5),
        now - Duration::days(4),
        BookingStatus::Approved,
    )
    .await;
    let later = insert_booking(
        &deps,
        booker.user_id,
        &drill,
        now + Duration::days(4),
        now + Duration::days(5),
        BookingStatus::Approved,
    )
    .await;
    // 承認されていない予約は対象外
    insert_booking(
        &deps,
        booker.user_id,
        &drill,
        now + Duration::days(10),
        now + Duration::days(11),
        BookingStatus::Waiting,
    )
    .await;

    let as_owner = item::get_item(&deps, drill.item_id, owner.user_id).await.unwrap();
    assert_eq!(
        as_owner.last_booking.map(|b| b.booking_id),
        Some(earlier.booking_id)
    );
    assert_eq!(
        as_owner.next_booking.map(|b| b.booking_id),
        Some(later.booking_id)
    );

    let as_booker = item::get_item(&deps, drill.item_id, booker.user_id).await.unwrap();
    assert!(as_booker.last_booking.is_none());
    assert!(as_booker.next_booking.is_none());
}

#[tokio::test]
async fn test_annotation_without_approved_bookings_is_empty() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;

    let annotation = item::annotate(&deps, &drill, owner.user_id).await.unwrap();

    assert_eq!(annotation, item::BookingAnnotation::default());
}

#[tokio::test]
async fn test_list_owner_items_in_creation_order_with_annotation() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let other = register(&deps, "Bob").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;
    let tent = list_item(&deps, owner.user_id, "Tent", true).await;
    list_item(&deps, other.user_id, "Kayak", true).await;
    let now = Utc::now();
    let approved = insert_booking(
        &deps,
        other.user_id,
        &tent,
        now - Duration::days(2),
        now - Duration::days(1),
        BookingStatus::Approved,
    )
    .await;

    let items = item::list_owner_items(&deps, owner.user_id, page(0, 20))
        .await
        .unwrap();

    let ids: Vec<ItemId> = items.iter().map(|d| d.item.item_id).collect();
    assert_eq!(ids, vec![drill.item_id, tent.item_id]);
    assert!(items[0].last_booking.is_none());
    assert_eq!(
        items[1].last_booking.as_ref().map(|b| b.booking_id),
        Some(approved.booking_id)
    );

    let second_page = item::list_owner_items(&deps, owner.user_id, page(1, 1))
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].item.item_id, tent.item_id);
}

// ============================================================================
// コメント
// ============================================================================

#[tokio::test]
async fn test_comment_requires_started_approved_booking() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let renter = register(&deps, "Dan").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;

    // 予約なし
    let result = item::add_comment(&deps, comment_cmd(renter.user_id, drill.item_id, "Great drill")).await;
    assert!(matches!(result, Err(ApplicationError::InvalidState(_))));

    let now = Utc::now();
    // 未来の承認済み予約、開始済みの却下された予約はどちらも対象外
    insert_booking(
        &deps,
        renter.user_id,
        &drill,
        now + Duration::days(1),
        now + Duration::days(2),
        BookingStatus::Approved,
    )
    .await;
    insert_booking(
        &deps,
        renter.user_id,
        &drill,
        now - Duration::days(3),
        now - Duration::days(2),
        BookingStatus::Rejected,
    )
    .await;
    let result = item::add_comment(&deps, comment_cmd(renter.user_id, drill.item_id, "Great drill")).await;
    assert!(matches!(result, Err(ApplicationError::InvalidState(_))));

    insert_booking(
        &deps,
        renter.user_id,
        &drill,
        now - Duration::days(2),
        now - Duration::days(1),
        BookingStatus::Approved,
    )
    .await;

    let comment = item::add_comment(&deps, comment_cmd(renter.user_id, drill.item_id, "Great drill"))
        .await
        .unwrap();
    assert_eq!(comment.author_name, "Dan");
    assert_eq!(comment.text, "Great drill");

    let details = item::get_item(&deps, drill.item_id, renter.user_id).await.unwrap();
    assert_eq!(details.comments, vec![comment]);
}

#[tokio::test]
async fn test_comment_with_blank_text_is_invalid_input() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;

    // 本文の検証は存在確認より先
    let result = item::add_comment(&deps, comment_cmd(UserId::new(), drill.item_id, "  ")).await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_comment_on_unknown_item_is_not_found() {
    let deps = memory::service_dependencies();
    let renter = register(&deps, "Dan").await;

    let result = item::add_comment(&deps, comment_cmd(renter.user_id, ItemId::new(), "Hello")).await;

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

// ============================================================================
// アイテムリクエスト
// ============================================================================

#[tokio::test]
async fn test_item_request_lists_with_answering_items() {
    let deps = memory::service_dependencies();
    let requester = register(&deps, "Alice").await;
    let owner = register(&deps, "Bob").await;
    let now = Utc::now();

    let older = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.user_id,
            description: "Need a tent".to_string(),
            requested_at: now - Duration::hours(1),
        },
    )
    .await
    .unwrap();
    let newer = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.user_id,
            description: "Need a ladder".to_string(),
            requested_at: now,
        },
    )
    .await
    .unwrap();

    let tent = item::create_item(
        &deps,
        CreateItem {
            owner_id: owner.user_id,
            name: "Tent".to_string(),
            description: "Two person tent".to_string(),
            available: true,
            request_id: Some(older.request_id),
        },
    )
    .await
    .unwrap();

    let own = item_request::list_own_requests(&deps, requester.user_id)
        .await
        .unwrap();
    let own_ids: Vec<ItemRequestId> = own.iter().map(|d| d.request.request_id).collect();
    assert_eq!(own_ids, vec![newer.request_id, older.request_id]);
    assert!(own[0].items.is_empty());
    assert_eq!(own[1].items, vec![tent]);

    // 他のユーザーから見た一覧には含まれ、本人の一覧には含まれない
    let seen_by_owner = item_request::list_other_requests(&deps, owner.user_id, page(0, 10))
        .await
        .unwrap();
    assert_eq!(seen_by_owner.len(), 2);
    let seen_by_requester = item_request::list_other_requests(&deps, requester.user_id, page(0, 10))
        .await
        .unwrap();
    assert!(seen_by_requester.is_empty());

    let single = item_request::get_item_request(&deps, owner.user_id, older.request_id)
        .await
        .unwrap();
    assert_eq!(single.request, older);
    assert_eq!(single.items.len(), 1);
}

#[tokio::test]
async fn test_item_request_validation() {
    let deps = memory::service_dependencies();
    let requester = register(&deps, "Alice").await;

    let blank = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.user_id,
            description: " ".to_string(),
            requested_at: Utc::now(),
        },
    )
    .await;
    assert!(matches!(blank, Err(ApplicationError::InvalidInput(_))));

    let unknown_user = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: UserId::new(),
            description: "Need a tent".to_string(),
            requested_at: Utc::now(),
        },
    )
    .await;
    assert!(matches!(unknown_user, Err(ApplicationError::NotFound(_))));

    let missing = item_request::get_item_request(&deps, requester.user_id, ItemRequestId::new()).await;
    assert!(matches!(missing, Err(ApplicationError::NotFound(_))));
}

// ============================================================================
// 削除の連鎖・予約のアイテム情報
// ============================================================================

#[tokio::test]
async fn test_delete_item_removes_its_bookings_and_comments() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let renter = register(&deps, "Dan").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;
    let now = Utc::now();
    let past = insert_booking(
        &deps,
        renter.user_id,
        &drill,
        now - Duration::days(2),
        now - Duration::days(1),
        BookingStatus::Approved,
    )
    .await;
    item::add_comment(&deps, comment_cmd(renter.user_id, drill.item_id, "Worked well"))
        .await
        .unwrap();

    item::delete_item(&deps, owner.user_id, drill.item_id).await.unwrap();

    let as_owner = booking::list_by_owner(&deps, all_bookings(owner.user_id))
        .await
        .unwrap();
    assert!(as_owner.is_empty());
    let as_booker = booking::list_by_booker(&deps, all_bookings(renter.user_id))
        .await
        .unwrap();
    assert!(as_booker.is_empty());
    assert!(matches!(
        booking::get_booking(&deps, renter.user_id, past.booking_id).await,
        Err(ApplicationError::NotFound(_))
    ));
    let comments = deps.comment_repository.find_by_item(drill.item_id).await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_delete_user_removes_owned_items_and_bookings() {
    let deps = memory::service_dependencies();
    let alice = register(&deps, "Alice").await;
    let bob = register(&deps, "Bob").await;
    let drill = list_item(&deps, alice.user_id, "Drill", true).await;
    let tent = list_item(&deps, bob.user_id, "Tent", true).await;
    let now = Utc::now();
    insert_booking(
        &deps,
        bob.user_id,
        &drill,
        now + Duration::days(1),
        now + Duration::days(2),
        BookingStatus::Waiting,
    )
    .await;
    insert_booking(
        &deps,
        alice.user_id,
        &tent,
        now + Duration::days(1),
        now + Duration::days(2),
        BookingStatus::Waiting,
    )
    .await;

    user::delete_user(&deps, alice.user_id).await.unwrap();

    let found = item::search_items(&deps, "drill", page(0, 20)).await.unwrap();
    assert!(found.is_empty());
    let booked_by_bob = booking::list_by_booker(&deps, all_bookings(bob.user_id))
        .await
        .unwrap();
    assert!(booked_by_bob.is_empty());
    let on_bobs_items = booking::list_by_owner(&deps, all_bookings(bob.user_id))
        .await
        .unwrap();
    assert!(on_bobs_items.is_empty());

    let result = booking::create_booking(
        &deps,
        CreateBooking {
            booker_id: bob.user_id,
            item_id: drill.item_id,
            start: now + Duration::days(3),
            end: now + Duration::days(4),
            requested_at: now,
        },
    )
    .await;
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));

    // 他のユーザーのアイテムは残る
    let remaining = item::get_item(&deps, tent.item_id, bob.user_id).await.unwrap();
    assert_eq!(remaining.item, tent);
}

#[tokio::test]
async fn test_delete_requester_detaches_answering_items() {
    let deps = memory::service_dependencies();
    let requester = register(&deps, "Alice").await;
    let owner = register(&deps, "Bob").await;
    let request = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.user_id,
            description: "Need a tent".to_string(),
            requested_at: Utc::now(),
        },
    )
    .await
    .unwrap();
    let tent = item::create_item(
        &deps,
        CreateItem {
            owner_id: owner.user_id,
            name: "Tent".to_string(),
            description: "Two person tent".to_string(),
            available: true,
            request_id: Some(request.request_id),
        },
    )
    .await
    .unwrap();

    user::delete_user(&deps, requester.user_id).await.unwrap();

    let details = item::get_item(&deps, tent.item_id, owner.user_id).await.unwrap();
    assert_eq!(details.item.request_id, None);
    let others = item_request::list_other_requests(&deps, owner.user_id, page(0, 10))
        .await
        .unwrap();
    assert!(others.is_empty());
}

#[tokio::test]
async fn test_renamed_item_shows_new_name_in_bookings() {
    let deps = memory::service_dependencies();
    let owner = register(&deps, "Alice").await;
    let booker = register(&deps, "Bob").await;
    let drill = list_item(&deps, owner.user_id, "Drill", true).await;
    let now = Utc::now();
    let booked = insert_booking(
        &deps,
        booker.user_id,
        &drill,
        now + Duration::days(1),
        now + Duration::days(2),
        BookingStatus::Waiting,
    )
    .await;

    item::update_item(
        &deps,
        UpdateItem {
            user_id: owner.user_id,
            item_id: drill.item_id,
            patch: ItemPatch {
                name: Some("Hammer Drill".to_string()),
                ..ItemPatch::default()
            },
        },
    )
    .await
    .unwrap();

    let single = booking::get_booking(&deps, booker.user_id, booked.booking_id)
        .await
        .unwrap();
    assert_eq!(single.item.name, "Hammer Drill");
    let listed = booking::list_by_owner(&deps, all_bookings(owner.user_id))
        .await
        .unwrap();
    assert_eq!(listed[0].item.name, "Hammer Drill");
}
