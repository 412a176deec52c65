use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use limacentro_core::catalog::{
    validate_category, validate_coordinates, validate_district, Rating,
};
use limacentro_core::error::CoreError;
use limacentro_core::moderation::{verify_transition, ListingStatus};
use limacentro_core::search::like_pattern;
use limacentro_core::types::DbId;
use limacentro_core::visibility::{scope, Requester, ScopeFlags};
use limacentro_db::models::{Business, CreateBusiness, UpdateBusinessFields, User};
use limacentro_db::repositories::{BusinessRepo, ListingFilter, UserRepo};
use limacentro_notify::ListingEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::with_db_timeout;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub district: Option<String>,
    /// Free-text needle matched against name and description.
    pub q: Option<String>,
    /// Admin-only: include all moderation states.
    #[serde(default)]
    pub admin: bool,
    /// Restrict to the requester's own listings.
    #[serde(default)]
    pub my_business: bool,
}

/// All fields optional so a missing one yields a named 400, not a bare 422
/// from the JSON extractor.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub district: Option<String>,
    #[validate(length(min = 1, max = 300, message = "address must be 1-300 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "description must be 1-2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    pub rating: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[validate(url(message = "imageUrl must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Partial edit. An omitted key leaves the field alone; an explicit `null`
/// on a nullable field clears it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub district: Option<String>,
    #[validate(length(min = 1, max = 300, message = "address must be 1-300 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "description must be 1-2000 characters"))]
    pub description: Option<String>,
    #[serde(default, with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub website: Option<Option<String>>,
    pub rating: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default, with = "double_option")]
    pub image_url: Option<Option<String>>,
    /// Moderation target. Honored only for administrators; silently ignored
    /// otherwise so owner edit forms can round-trip the full object.
    pub status: Option<String>,
}

/// Distinguishes an absent JSON key (`None`) from an explicit `null`
/// (`Some(None)`) during deserialization.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

fn required<T>(value: Option<T>, name: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /businesses` — search the directory.
///
/// The visibility scope is computed before the query runs; rows outside it
/// are never fetched.
pub async fn list_businesses(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Business>>> {
    if let Some(category) = &query.category {
        validate_category(category)?;
    }
    if let Some(district) = &query.district {
        validate_district(district)?;
    }

    let requester = user.as_ref().map(|u| Requester {
        user_id: u.id,
        role: u.role.clone(),
    });
    let scope = scope(
        requester.as_ref(),
        ScopeFlags {
            show_all: query.admin,
            mine: query.my_business,
        },
    );
    let filter = ListingFilter {
        category: query.category,
        district: query.district,
        query: query.q.as_deref().and_then(like_pattern),
    };

    let listings = with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::search(&state.pool, &scope, &filter),
    )
    .await?;
    Ok(Json(listings))
}

/// `POST /businesses` — submit a listing.
///
/// New listings enter the moderation queue as PENDING unless the submitter
/// is an admin and auto-approval is on.
pub async fn create_business(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBusinessRequest>,
) -> AppResult<(StatusCode, Json<Business>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let name = required(payload.name, "name")?;
    let category = required(payload.category, "category")?;
    let district = required(payload.district, "district")?;
    let address = required(payload.address, "address")?;
    let description = required(payload.description, "description")?;
    let rating = required(payload.rating, "rating")?;
    let lat = required(payload.lat, "lat")?;
    let lng = required(payload.lng, "lng")?;

    validate_category(&category)?;
    validate_district(&district)?;
    Rating::parse(&rating)?;
    validate_coordinates(lat, lng)?;

    let status = if user.is_admin() && state.config.admin_auto_approve {
        ListingStatus::Approved
    } else {
        ListingStatus::Pending
    };

    let create = CreateBusiness {
        owner_id: user.0.id,
        name,
        category,
        district,
        address,
        description,
        phone: payload.phone,
        website: payload.website,
        rating,
        lat,
        lng,
        image_url: payload.image_url,
        status: status.as_str().to_string(),
    };
    let business = with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::create(&state.pool, &create),
    )
    .await?;

    // The row is committed; from here on notification delivery is
    // best-effort.
    if status == ListingStatus::Pending {
        state.event_bus.publish(ListingEvent::Submitted {
            id: business.id,
            name: business.name.clone(),
        });
    }

    tracing::info!(
        listing_id = business.id,
        owner_id = business.owner_id,
        status = %business.status,
        "listing created"
    );
    Ok((StatusCode::CREATED, Json(business)))
}

/// `GET /businesses/{id}` — fetch one listing.
///
/// Non-approved listings resolve only for their owner or an admin; everyone
/// else gets the same 404 as a missing row.
pub async fn get_business(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Business>> {
    let business = fetch_business(&state, id).await?;

    if business.status != ListingStatus::Approved.as_str() && !can_manage(user.as_ref(), &business)
    {
        return Err(not_found(id));
    }
    Ok(Json(business))
}

/// `PUT /businesses/{id}` — edit a listing, and for admins, moderate it.
pub async fn update_business(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(payload): Json<UpdateBusinessRequest>,
) -> AppResult<Json<Business>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let business = fetch_business(&state, id).await?;
    if !can_manage(Some(&user.0), &business) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an admin may modify this listing".into(),
        )));
    }

    if let Some(category) = &payload.category {
        validate_category(category)?;
    }
    if let Some(district) = &payload.district {
        validate_district(district)?;
    }
    if let Some(rating) = &payload.rating {
        Rating::parse(rating)?;
    }
    if payload.lat.is_some() || payload.lng.is_some() {
        let lat = payload.lat.unwrap_or(business.lat);
        let lng = payload.lng.unwrap_or(business.lng);
        validate_coordinates(lat, lng)?;
    }

    let fields = UpdateBusinessFields {
        name: payload.name,
        category: payload.category,
        district: payload.district,
        address: payload.address,
        description: payload.description,
        phone: payload.phone,
        website: payload.website,
        rating: payload.rating,
        lat: payload.lat,
        lng: payload.lng,
        image_url: payload.image_url,
    };
    // Field edits never touch the status column; an owner resubmitting
    // their form cannot reset moderation.
    let mut business = with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::update_fields(&state.pool, id, &fields),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    if let Some(target) = payload.status.as_deref() {
        if user.is_admin() && target != business.status {
            business = moderate(&state, business, target).await?;
        }
    }

    Ok(Json(business))
}

/// `DELETE /businesses/{id}` — remove a listing (owner or admin).
pub async fn delete_business(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    let business = fetch_business(&state, id).await?;
    if !can_manage(Some(&user.0), &business) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an admin may delete this listing".into(),
        )));
    }

    let deleted = with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::delete(&state.pool, id),
    )
    .await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(listing_id = id, user_id = user.0.id, "listing deleted");
    Ok(Json(json!({ "message": "Business deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_business(state: &AppState, id: DbId) -> AppResult<Business> {
    with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::find_by_id(&state.pool, id),
    )
    .await?
    .ok_or_else(|| not_found(id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Business",
        id,
    })
}

fn can_manage(user: Option<&User>, business: &Business) -> bool {
    match user {
        Some(user) => user.is_admin() || user.id == business.owner_id,
        None => false,
    }
}

/// Apply an admin moderation decision.
///
/// The state machine is checked first for a precise error, then the guarded
/// UPDATE re-checks under the row lock so two concurrent moderators cannot
/// both win.
async fn moderate(state: &AppState, business: Business, target: &str) -> AppResult<Business> {
    let current = ListingStatus::parse(&business.status)?;
    let target = ListingStatus::parse(target)?;
    verify_transition(current, target)?;

    let updated = with_db_timeout(
        state.config.db_timeout_secs,
        BusinessRepo::transition_from_pending(&state.pool, business.id, target.as_str()),
    )
    .await?;
    let Some(updated) = updated else {
        // Lost the race: the row moved (or vanished) between the fetch and
        // the guarded update.
        return match fetch_business(state, business.id).await {
            Ok(current) => Err(AppError::Core(CoreError::Conflict(format!(
                "listing is already {}",
                current.status
            )))),
            Err(err) => Err(err),
        };
    };

    if target == ListingStatus::Approved {
        let owner = with_db_timeout(
            state.config.db_timeout_secs,
            UserRepo::find_by_id(&state.pool, updated.owner_id),
        )
        .await?;
        if let Some(owner) = owner {
            state.event_bus.publish(ListingEvent::Approved {
                id: updated.id,
                name: updated.name.clone(),
                owner_email: owner.email,
            });
        }
    }

    tracing::info!(
        listing_id = updated.id,
        status = %updated.status,
        "moderation decision applied"
    );
    Ok(updated)
}
