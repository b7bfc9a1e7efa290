use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::coordinates::dtos::{
    to_decimal, CoordinateResponseDto, UpdateCoordinateDto, UpsertCoordinateDto,
};
use crate::features::coordinates::models::Coordinate;
use crate::shared::induk_unit::IndukUnit;

const COORDINATE_COLUMNS: &str = "id, induk_unit, latitude, longitude, created_at, updated_at";

/// Service for induk unit coordinates
pub struct CoordinateService {
    pool: PgPool,
}

impl CoordinateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CoordinateResponseDto>> {
        let coordinates = sqlx::query_as::<_, Coordinate>(&format!(
            "SELECT {} FROM coordinates ORDER BY induk_unit",
            COORDINATE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list coordinates: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(coordinates.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<CoordinateResponseDto> {
        let coordinate = sqlx::query_as::<_, Coordinate>(&format!(
            "SELECT {} FROM coordinates WHERE id = $1",
            COORDINATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        coordinate
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Coordinate {} not found", id)))
    }

    /// Create the coordinate of a unit, or replace it when one exists
    pub async fn upsert(&self, dto: UpsertCoordinateDto) -> Result<CoordinateResponseDto> {
        let induk = dto.induk()?;
        let latitude = to_decimal(dto.latitude, "latitude")?;
        let longitude = to_decimal(dto.longitude, "longitude")?;

        let coordinate = sqlx::query_as::<_, Coordinate>(&format!(
            r#"
            INSERT INTO coordinates (induk_unit, latitude, longitude)
            VALUES ($1, $2, $3)
            ON CONFLICT (induk_unit) DO UPDATE
            SET latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = NOW()
            RETURNING {}
            "#,
            COORDINATE_COLUMNS
        ))
        .bind(induk.name())
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(induk_unit = %induk, "Coordinate saved");
        Ok(coordinate.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateCoordinateDto) -> Result<CoordinateResponseDto> {
        let latitude = to_decimal(dto.latitude, "latitude")?;
        let longitude = to_decimal(dto.longitude, "longitude")?;

        let coordinate = sqlx::query_as::<_, Coordinate>(&format!(
            r#"
            UPDATE coordinates
            SET latitude = $2, longitude = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COORDINATE_COLUMNS
        ))
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        coordinate
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Coordinate {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM coordinates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete coordinate: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Coordinate {} not found", id)));
        }
        Ok(())
    }

    /// Latitude/longitude of the given units; units without a coordinate are absent
    pub async fn for_units(&self, units: &[IndukUnit]) -> Result<HashMap<IndukUnit, (f64, f64)>> {
        let names: Vec<String> = units.iter().map(|u| u.name().to_string()).collect();

        let coordinates = sqlx::query_as::<_, Coordinate>(&format!(
            "SELECT {} FROM coordinates WHERE induk_unit = ANY($1)",
            COORDINATE_COLUMNS
        ))
        .bind(&names)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get coordinates for units: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(coordinates
            .into_iter()
            .filter_map(|c| {
                let unit = IndukUnit::from_name(&c.induk_unit)?;
                Some((unit, (c.latitude.to_f64()?, c.longitude.to_f64()?)))
            })
            .collect())
    }
}
