//! Integration tests for the repository layer against a real database:
//! - Admin bootstrap upsert semantics
//! - Unique constraint violations on the users table
//! - Identity linking leaving the role column alone
//! - Guarded moderation transitions under stale reads
//! - Listing search scoping, ordering, and pattern escaping

use limacentro_core::moderation::ListingStatus;
use limacentro_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use limacentro_core::search::like_pattern;
use limacentro_core::visibility::VisibilityScope;
use limacentro_db::models::{CreateBusiness, CreateUser};
use limacentro_db::repositories::{BusinessRepo, ListingFilter, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, external_id: Option<&str>) -> CreateUser {
    CreateUser {
        external_id: external_id.map(str::to_string),
        email: email.to_string(),
        display_name: "Test User".to_string(),
        avatar_url: None,
        role: ROLE_MEMBER.to_string(),
    }
}

fn new_listing(owner_id: i64, name: &str, status: ListingStatus) -> CreateBusiness {
    CreateBusiness {
        owner_id,
        name: name.to_string(),
        category: "Restaurante".to_string(),
        district: "Miraflores".to_string(),
        address: "Av. Larco 123".to_string(),
        description: "Cocina criolla".to_string(),
        phone: None,
        website: None,
        rating: "👍".to_string(),
        lat: -12.1211,
        lng: -77.0297,
        image_url: None,
        status: status.as_str().to_string(),
    }
}

fn approved_scope() -> VisibilityScope {
    VisibilityScope {
        status: Some(ListingStatus::Approved),
        owner: None,
    }
}

// ---------------------------------------------------------------------------
// Test: Admin bootstrap upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap_admin_inserts_when_missing(pool: PgPool) {
    let admin = UserRepo::bootstrap_admin(&pool, "ana@example.com")
        .await
        .unwrap();
    assert_eq!(admin.email, "ana@example.com");
    assert_eq!(admin.role, ROLE_ADMIN);
    assert!(admin.external_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap_admin_promotes_existing_member(pool: PgPool) {
    let member = UserRepo::create(&pool, &new_user("ana@example.com", Some("ext-9")))
        .await
        .unwrap();

    let admin = UserRepo::bootstrap_admin(&pool, "ana@example.com")
        .await
        .unwrap();

    // Same row, promoted; profile and identity link untouched.
    assert_eq!(admin.id, member.id);
    assert_eq!(admin.role, ROLE_ADMIN);
    assert_eq!(admin.external_id.as_deref(), Some("ext-9"));
    assert_eq!(admin.display_name, "Test User");
}

// ---------------------------------------------------------------------------
// Test: Unique constraint on email
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected_by_named_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com", Some("ext-1")))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@example.com", Some("ext-2")))
        .await
        .unwrap_err();

    // The error classifier keys on the 23505 code and the uq_ prefix.
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: Identity linking never touches the role
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_link_identity_preserves_admin_role(pool: PgPool) {
    let admin = UserRepo::bootstrap_admin(&pool, "ana@example.com")
        .await
        .unwrap();

    let linked = UserRepo::link_identity(&pool, admin.id, "ext-1", "Ana", None)
        .await
        .unwrap();

    assert_eq!(linked.id, admin.id);
    assert_eq!(linked.role, ROLE_ADMIN);
    assert_eq!(linked.external_id.as_deref(), Some("ext-1"));
    assert_eq!(linked.display_name, "Ana");
}

// ---------------------------------------------------------------------------
// Test: Guarded moderation transition
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_transition_moves_pending_exactly_once(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    let listing = BusinessRepo::create(
        &pool,
        &new_listing(owner.id, "Cevichería El Norte", ListingStatus::Pending),
    )
    .await
    .unwrap();

    let approved = BusinessRepo::transition_from_pending(&pool, listing.id, "APPROVED")
        .await
        .unwrap()
        .expect("pending row should transition");
    assert_eq!(approved.status, "APPROVED");

    // A second writer working from the same stale PENDING read gets no row.
    let second = BusinessRepo::transition_from_pending(&pool, listing.id, "REJECTED")
        .await
        .unwrap();
    assert!(second.is_none());

    // The first decision stands.
    let current = BusinessRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, "APPROVED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transition_skips_rows_born_terminal(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    let listing = BusinessRepo::create(
        &pool,
        &new_listing(owner.id, "Hotel Costanera", ListingStatus::Approved),
    )
    .await
    .unwrap();

    let result = BusinessRepo::transition_from_pending(&pool, listing.id, "REJECTED")
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: Search scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_approved_scope_excludes_pending(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    BusinessRepo::create(&pool, &new_listing(owner.id, "A", ListingStatus::Approved))
        .await
        .unwrap();
    BusinessRepo::create(&pool, &new_listing(owner.id, "B", ListingStatus::Approved))
        .await
        .unwrap();
    BusinessRepo::create(&pool, &new_listing(owner.id, "C", ListingStatus::Pending))
        .await
        .unwrap();

    let results = BusinessRepo::search(&pool, &approved_scope(), &ListingFilter::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|b| b.status == "APPROVED"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_owner_scope_spans_statuses(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    let other = UserRepo::create(&pool, &new_user("other@example.com", Some("ext-2")))
        .await
        .unwrap();
    BusinessRepo::create(&pool, &new_listing(owner.id, "Mine 1", ListingStatus::Pending))
        .await
        .unwrap();
    BusinessRepo::create(
        &pool,
        &new_listing(owner.id, "Mine 2", ListingStatus::Rejected),
    )
    .await
    .unwrap();
    BusinessRepo::create(
        &pool,
        &new_listing(other.id, "Theirs", ListingStatus::Approved),
    )
    .await
    .unwrap();

    let scope = VisibilityScope {
        status: None,
        owner: Some(owner.id),
    };
    let results = BusinessRepo::search(&pool, &scope, &ListingFilter::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|b| b.owner_id == owner.id));
}

// ---------------------------------------------------------------------------
// Test: Search ordering is newest-first and total
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_orders_newest_first_with_id_tiebreak(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    for name in ["First", "Second", "Third"] {
        BusinessRepo::create(&pool, &new_listing(owner.id, name, ListingStatus::Approved))
            .await
            .unwrap();
    }

    let results = BusinessRepo::search(&pool, &approved_scope(), &ListingFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = results.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Third", "Second", "First"]);
    // Rows created in the same instant still order by id, so the order is
    // total.
    assert!(results.windows(2).all(|w| w[0].id > w[1].id));
}

// ---------------------------------------------------------------------------
// Test: Text filter is case-insensitive and matches literally
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_text_filter_escapes_wildcards(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com", Some("ext-1")))
        .await
        .unwrap();
    BusinessRepo::create(
        &pool,
        &new_listing(owner.id, "Café 100% Natural", ListingStatus::Approved),
    )
    .await
    .unwrap();
    BusinessRepo::create(
        &pool,
        &new_listing(owner.id, "Cafetal", ListingStatus::Approved),
    )
    .await
    .unwrap();

    // "%" matched literally, not as a wildcard.
    let filter = ListingFilter {
        query: like_pattern("100%"),
        ..Default::default()
    };
    let results = BusinessRepo::search(&pool, &approved_scope(), &filter)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Café 100% Natural");

    // Case-insensitive substring over name.
    let filter = ListingFilter {
        query: like_pattern("caf"),
        ..Default::default()
    };
    let results = BusinessRepo::search(&pool, &approved_scope(), &filter)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}
