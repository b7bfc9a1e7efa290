use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::coordinates::models::Coordinate;
use crate::shared::induk_unit::IndukUnit;

/// Request DTO for creating or replacing the coordinate of an induk unit
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertCoordinateDto {
    /// Canonical induk unit name
    #[validate(length(min = 1, max = 255, message = "induk_unit must be 1-255 characters"))]
    pub induk_unit: String,

    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

impl UpsertCoordinateDto {
    pub fn induk(&self) -> Result<IndukUnit, AppError> {
        IndukUnit::from_name(&self.induk_unit)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown induk unit: {}", self.induk_unit)))
    }
}

/// Request DTO for moving an existing coordinate
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCoordinateDto {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoordinateResponseDto {
    pub id: Uuid,
    pub induk_unit: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Coordinate> for CoordinateResponseDto {
    fn from(c: Coordinate) -> Self {
        Self {
            id: c.id,
            latitude: c.latitude.to_f64().unwrap_or_default(),
            longitude: c.longitude.to_f64().unwrap_or_default(),
            induk_unit: c.induk_unit,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Convert a validated degree value for storage in a NUMERIC column
pub fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    Decimal::try_from(value).map_err(|_| AppError::Validation(format!("{} is not a valid number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_dto_ranges() {
        let mut dto = UpsertCoordinateDto {
            induk_unit: "Kantor Kementerian Agama Kota Mataram".to_string(),
            latitude: -8.5833,
            longitude: 116.1167,
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.induk().unwrap(), IndukUnit::KotaMataram);

        dto.latitude = 90.5;
        assert!(dto.validate().is_err());

        dto.latitude = -90.0;
        dto.longitude = -180.5;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_upsert_dto_rejects_unknown_unit() {
        let dto = UpsertCoordinateDto {
            induk_unit: "Kantor Kementerian Agama Kabupaten Bantul".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };
        assert!(dto.validate().is_ok());
        assert!(matches!(dto.induk(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_to_decimal() {
        let d = to_decimal(-8.4511, "latitude").unwrap();
        assert!((d.to_f64().unwrap() + 8.4511).abs() < 1e-9);
        assert!(to_decimal(f64::NAN, "latitude").is_err());
    }

    #[test]
    fn test_response_from_model() {
        let now = Utc::now();
        let dto = CoordinateResponseDto::from(Coordinate {
            id: Uuid::nil(),
            induk_unit: IndukUnit::Dompu.name().to_string(),
            latitude: Decimal::new(-85376, 4),
            longitude: Decimal::new(1184636, 4),
            created_at: now,
            updated_at: now,
        });

        assert!((dto.latitude + 8.5376).abs() < 1e-9);
        assert!((dto.longitude - 118.4636).abs() < 1e-9);
    }
}
