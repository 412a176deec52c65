//! The fixed catalog of districts, categories, and ratings.
//!
//! Listings may only reference values from these enumerations; the API layer
//! rejects anything else at the boundary with a validation error naming the
//! offending field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The 43 districts of metropolitan Lima.
pub const DISTRICTS: &[&str] = &[
    "Ancón",
    "Ate",
    "Barranco",
    "Breña",
    "Carabayllo",
    "Chaclacayo",
    "Chorrillos",
    "Cieneguilla",
    "Comas",
    "El Agustino",
    "Independencia",
    "Jesús María",
    "La Molina",
    "La Victoria",
    "Lima",
    "Lince",
    "Los Olivos",
    "Lurigancho",
    "Lurín",
    "Magdalena del Mar",
    "Miraflores",
    "Pachacámac",
    "Pucusana",
    "Pueblo Libre",
    "Puente Piedra",
    "Punta Hermosa",
    "Punta Negra",
    "Rímac",
    "San Bartolo",
    "San Borja",
    "San Isidro",
    "San Juan de Lurigancho",
    "San Juan de Miraflores",
    "San Luis",
    "San Martín de Porres",
    "San Miguel",
    "Santa Anita",
    "Santa María del Mar",
    "Santa Rosa",
    "Santiago de Surco",
    "Surquillo",
    "Villa El Salvador",
    "Villa María del Triunfo",
];

/// Listing categories.
pub const CATEGORIES: &[&str] = &[
    "Restaurante",
    "Hotel",
    "Tienda",
    "Servicios",
    "Salud",
    "Educación",
    "Tecnología",
    "Turismo",
    "Otros",
];

/// Validate that `district` is one of [`DISTRICTS`].
pub fn validate_district(district: &str) -> Result<(), CoreError> {
    if DISTRICTS.contains(&district) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "unknown district: {district}"
        )))
    }
}

/// Validate that `category` is one of [`CATEGORIES`].
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "unknown category: {category}"
        )))
    }
}

/// Five-point qualitative rating scale, best to worst.
///
/// Serialized (JSON and database) as the symbol itself, which is the wire
/// format the frontend renders directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "🔥")]
    Excellent,
    #[serde(rename = "👍")]
    Good,
    #[serde(rename = "😑")]
    Average,
    #[serde(rename = "🤢")]
    Bad,
    #[serde(rename = "💩")]
    Terrible,
}

impl Rating {
    /// The canonical symbol stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Excellent => "🔥",
            Rating::Good => "👍",
            Rating::Average => "😑",
            Rating::Bad => "🤢",
            Rating::Terrible => "💩",
        }
    }

    /// Parse a stored or submitted symbol.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "🔥" => Ok(Rating::Excellent),
            "👍" => Ok(Rating::Good),
            "😑" => Ok(Rating::Average),
            "🤢" => Ok(Rating::Bad),
            "💩" => Ok(Rating::Terrible),
            other => Err(CoreError::Validation(format!("unknown rating: {other}"))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate geographic coordinates.
///
/// Listings must carry geocoded coordinates before persistence.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoreError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(CoreError::Validation(format!("latitude out of range: {lat}")));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(CoreError::Validation(format!(
            "longitude out of range: {lng}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn known_district_and_category_pass() {
        assert!(validate_district("Miraflores").is_ok());
        assert!(validate_category("Restaurante").is_ok());
    }

    #[test]
    fn unknown_district_is_rejected_by_name() {
        let err = validate_district("Gotham").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("Gotham"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_matches!(validate_category("Casinos"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rating_round_trips_through_symbol() {
        for rating in [
            Rating::Excellent,
            Rating::Good,
            Rating::Average,
            Rating::Bad,
            Rating::Terrible,
        ] {
            assert_eq!(Rating::parse(rating.as_str()).unwrap(), rating);
        }
    }

    #[test]
    fn rating_serde_uses_symbols() {
        let json = serde_json::to_string(&Rating::Excellent).unwrap();
        assert_eq!(json, "\"🔥\"");
        let parsed: Rating = serde_json::from_str("\"💩\"").unwrap();
        assert_eq!(parsed, Rating::Terrible);
    }

    #[test]
    fn rating_is_ordered_best_to_worst() {
        assert!(Rating::Excellent < Rating::Good);
        assert!(Rating::Bad < Rating::Terrible);
    }

    #[test]
    fn coordinates_validated() {
        assert!(validate_coordinates(-12.0464, -77.0428).is_ok());
        assert_matches!(
            validate_coordinates(91.0, 0.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_coordinates(0.0, 200.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_coordinates(f64::NAN, 0.0),
            Err(CoreError::Validation(_))
        );
    }
}
