use limacentro_core::types::DbId;
use limacentro_core::visibility::VisibilityScope;
use sqlx::PgPool;

use crate::models::{Business, CreateBusiness, UpdateBusinessFields};

const COLUMNS: &str = "id, owner_id, name, category, district, address, description, \
     phone, website, rating, lat, lng, image_url, status, created_at, updated_at";

/// Optional facets applied on top of a visibility scope. `query` is a
/// ready-made ILIKE pattern (see `limacentro_core::search::like_pattern`).
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub district: Option<String>,
    pub query: Option<String>,
}

pub struct BusinessRepo;

impl BusinessRepo {
    pub async fn create(pool: &PgPool, listing: &CreateBusiness) -> Result<Business, sqlx::Error> {
        let sql = format!(
            "INSERT INTO businesses
                 (owner_id, name, category, district, address, description,
                  phone, website, rating, lat, lng, image_url, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&sql)
            .bind(listing.owner_id)
            .bind(&listing.name)
            .bind(&listing.category)
            .bind(&listing.district)
            .bind(&listing.address)
            .bind(&listing.description)
            .bind(&listing.phone)
            .bind(&listing.website)
            .bind(&listing.rating)
            .bind(listing.lat)
            .bind(listing.lng)
            .bind(&listing.image_url)
            .bind(&listing.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM businesses WHERE id = $1");
        sqlx::query_as::<_, Business>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List listings under a visibility scope plus optional facets, newest
    /// first (id breaks creation-time ties so the order is total).
    pub async fn search(
        pool: &PgPool,
        scope: &VisibilityScope,
        filter: &ListingFilter,
    ) -> Result<Vec<Business>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM businesses
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR owner_id = $2)
               AND ($3::TEXT IS NULL OR category = $3)
               AND ($4::TEXT IS NULL OR district = $4)
               AND ($5::TEXT IS NULL
                    OR name ILIKE $5 ESCAPE '\\'
                    OR description ILIKE $5 ESCAPE '\\')
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Business>(&sql)
            .bind(scope.status.map(|s| s.as_str()))
            .bind(scope.owner)
            .bind(&filter.category)
            .bind(&filter.district)
            .bind(&filter.query)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial edit. Absent fields keep their column values; the
    /// paired boolean binds let a present-but-null field clear a nullable
    /// column, which COALESCE alone cannot express.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        fields: &UpdateBusinessFields,
    ) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!(
            "UPDATE businesses SET
                 name = COALESCE($2, name),
                 category = COALESCE($3, category),
                 district = COALESCE($4, district),
                 address = COALESCE($5, address),
                 description = COALESCE($6, description),
                 rating = COALESCE($7, rating),
                 lat = COALESCE($8, lat),
                 lng = COALESCE($9, lng),
                 phone = CASE WHEN $10 THEN $11 ELSE phone END,
                 website = CASE WHEN $12 THEN $13 ELSE website END,
                 image_url = CASE WHEN $14 THEN $15 ELSE image_url END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.category)
            .bind(&fields.district)
            .bind(&fields.address)
            .bind(&fields.description)
            .bind(&fields.rating)
            .bind(fields.lat)
            .bind(fields.lng)
            .bind(fields.phone.is_some())
            .bind(fields.phone.clone().flatten())
            .bind(fields.website.is_some())
            .bind(fields.website.clone().flatten())
            .bind(fields.image_url.is_some())
            .bind(fields.image_url.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Move a PENDING listing to `target`. The status guard is in the WHERE
    /// clause so two concurrent moderators cannot both win; `None` means the
    /// row was missing or no longer pending and the caller must re-fetch to
    /// tell the two apart.
    pub async fn transition_from_pending(
        pool: &PgPool,
        id: DbId,
        target: &str,
    ) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!(
            "UPDATE businesses
             SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'PENDING'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&sql)
            .bind(id)
            .bind(target)
            .fetch_optional(pool)
            .await
    }

    /// Delete a listing, reporting whether a row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
