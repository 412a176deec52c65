use chrono::{DateTime, Utc};
use limacentro_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A business listing row.
///
/// `status`, `category`, `district` and `rating` are stored as plain text;
/// the core crate owns the valid vocabularies and the handlers validate
/// before anything reaches the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub district: String,
    pub address: String,
    pub description: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: String,
    pub lat: f64,
    pub lng: f64,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateBusiness {
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub district: String,
    pub address: String,
    pub description: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: String,
    pub lat: f64,
    pub lng: f64,
    pub image_url: Option<String>,
    pub status: String,
}

/// Partial update for an owner or admin edit. `None` leaves the column
/// untouched; clearing an optional column is expressed as `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UpdateBusinessFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub rating: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<Option<String>>,
}
