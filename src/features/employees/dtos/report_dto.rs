use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::employees::dtos::EmployeeResponseDto;
use crate::shared::induk_unit::IndukUnit;

/// Head counts by retirement status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmployeeStatisticsDto {
    pub total: i64,
    pub aktif: i64,
    pub pensiun: i64,
}

/// One heatmap marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HeatmapPointDto {
    pub location: String,
    pub induk_unit: IndukUnit,
    pub count: i64,
    pub aktif: i64,
    pub pensiun: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Employees of one induk unit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ByLocationResponseDto {
    pub location: String,
    pub induk_unit: IndukUnit,
    pub statistics: EmployeeStatisticsDto,
    pub employees: Vec<EmployeeResponseDto>,
}

/// Position option for filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JabatanOptionDto {
    pub code: String,
    pub name: String,
}
