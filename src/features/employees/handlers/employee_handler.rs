use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireAdmin, RequireEditor};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::employees::dtos::{
    ByLocationQuery, ByLocationResponseDto, CreateEmployeeDto, DistinctQuery, EmployeeListQuery,
    EmployeeResponseDto, EmployeeStatisticsDto, HeatmapPointDto, HeatmapQuery, JabatanOptionDto,
    UpdateEmployeeDto,
};
use crate::features::employees::services::EmployeeService;
use crate::shared::induk_unit::IndukUnit;
use crate::shared::types::{ApiResponse, Meta};

/// List employees
///
/// Every employee carries its derived `induk_unit` and `status`. Ordered
/// with the provincial office first, then by induk unit and name.
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("induk" = Option<String>, Query, description = "Canonical induk unit name"),
        ("status" = Option<String>, Query, description = "aktif or pensiun"),
        ("golongan" = Option<String>, Query, description = "Exact GOL_RUANG"),
        ("jabatan" = Option<String>, Query, description = "Exact KET_JABATAN"),
        ("kode_jabatan" = Option<String>, Query, description = "Exact KODE_JABATAN, overrides jabatan")
    ),
    responses(
        (status = 200, description = "List of employees", body = ApiResponse<Vec<EmployeeResponseDto>>),
        (status = 400, description = "Invalid filter")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_employees(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    AppQuery(query): AppQuery<EmployeeListQuery>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponseDto>>>> {
    let filter = query.into_filter()?;
    let employees = service.list(filter).await?;
    let total = employees.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(employees),
        None,
        Some(Meta { total }),
    )))
}

/// List the canonical induk units
#[utoipa::path(
    get,
    path = "/api/employees/induk-units",
    responses(
        (status = 200, description = "Canonical induk units", body = ApiResponse<Vec<IndukUnit>>),
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn induk_units(_user: AuthenticatedUser) -> Json<ApiResponse<Vec<IndukUnit>>> {
    let units = IndukUnit::ALL.to_vec();
    let total = units.len() as i64;
    Json(ApiResponse::success(Some(units), None, Some(Meta { total })))
}

/// Head counts by retirement status
#[utoipa::path(
    get,
    path = "/api/employees/statistics",
    responses(
        (status = 200, description = "Employee statistics", body = ApiResponse<EmployeeStatisticsDto>),
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn employee_statistics(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
) -> Result<Json<ApiResponse<EmployeeStatisticsDto>>> {
    let statistics = service.statistics().await?;
    Ok(Json(ApiResponse::success(Some(statistics), None, None)))
}

/// Employee counts per induk unit for the map
#[utoipa::path(
    get,
    path = "/api/employees/heatmap",
    params(
        ("type" = Option<String>, Query, description = "kabupaten (default) or kanwil"),
        ("include_inactive" = Option<String>, Query, description = "`true` counts retired employees too; any other value is false")
    ),
    responses(
        (status = 200, description = "Heatmap points", body = ApiResponse<Vec<HeatmapPointDto>>),
        (status = 400, description = "Invalid type")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn heatmap(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    AppQuery(query): AppQuery<HeatmapQuery>,
) -> Result<Json<ApiResponse<Vec<HeatmapPointDto>>>> {
    let kind = query.kind()?;
    let points = service.heatmap(kind, query.include_inactive()).await?;
    let total = points.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(points),
        None,
        Some(Meta { total }),
    )))
}

/// Employees of one induk unit with statistics
#[utoipa::path(
    get,
    path = "/api/employees/by-location",
    params(
        ("induk_unit" = String, Query, description = "Canonical induk unit name"),
        ("location" = Option<String>, Query, description = "Display name"),
        ("status" = Option<String>, Query, description = "aktif or pensiun")
    ),
    responses(
        (status = 200, description = "Employees of the location", body = ApiResponse<ByLocationResponseDto>),
        (status = 400, description = "Missing or invalid induk_unit")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn by_location(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    AppQuery(query): AppQuery<ByLocationQuery>,
) -> Result<Json<ApiResponse<ByLocationResponseDto>>> {
    let filter = query.into_filter()?;
    let result = service.by_location(filter).await?;
    let total = result.employees.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(result),
        None,
        Some(Meta { total }),
    )))
}

/// Distinct values of a whitelisted column
#[utoipa::path(
    get,
    path = "/api/employees/distinct",
    params(
        ("column" = String, Query, description = "KET_JABATAN, pangkat_asn, GOL_RUANG, SATUAN_KERJA or kab_kota")
    ),
    responses(
        (status = 200, description = "Distinct values", body = ApiResponse<Vec<String>>),
        (status = 400, description = "Column not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn distinct_values(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    AppQuery(query): AppQuery<DistinctQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let column = query.column()?;
    let values = service.distinct(column).await?;
    let total = values.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(values),
        None,
        Some(Meta { total }),
    )))
}

/// Position code/name pairs
#[utoipa::path(
    get,
    path = "/api/employees/jabatan-options",
    responses(
        (status = 200, description = "Position options", body = ApiResponse<Vec<JabatanOptionDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn jabatan_options(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
) -> Result<Json<ApiResponse<Vec<JabatanOptionDto>>>> {
    let options = service.jabatan_options().await?;
    let total = options.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(options),
        None,
        Some(Meta { total }),
    )))
}

/// Get employee by NIP_BARU
#[utoipa::path(
    get,
    path = "/api/employees/{nip_baru}",
    params(
        ("nip_baru" = String, Path, description = "Employee NIP_BARU")
    ),
    responses(
        (status = 200, description = "Employee found", body = ApiResponse<EmployeeResponseDto>),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn get_employee(
    _user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    Path(nip_baru): Path<String>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.get(&nip_baru).await?;
    Ok(Json(ApiResponse::success(Some(employee), None, None)))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "NIP_BARU already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create_employee(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<EmployeeService>>,
    AppJson(dto): AppJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let employee = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(employee),
            Some("Employee created".to_string()),
            None,
        )),
    ))
}

/// Partially update an employee
///
/// Only keys present in the body change; `null` clears a field. Operators
/// cannot change `NIP_BARU` and the value is ignored for them.
#[utoipa::path(
    put,
    path = "/api/employees/{nip_baru}",
    params(
        ("nip_baru" = String, Path, description = "Employee NIP_BARU")
    ),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin or operator access required"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "NIP_BARU already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn update_employee(
    RequireEditor(user): RequireEditor,
    State(service): State<Arc<EmployeeService>>,
    Path(nip_baru): Path<String>,
    AppJson(dto): AppJson<UpdateEmployeeDto>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let employee = service.update(&nip_baru, dto, user.is_admin()).await?;
    Ok(Json(ApiResponse::success(
        Some(employee),
        Some("Employee updated".to_string()),
        None,
    )))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{nip_baru}",
    params(
        ("nip_baru" = String, Path, description = "Employee NIP_BARU")
    ),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn delete_employee(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<EmployeeService>>,
    Path(nip_baru): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&nip_baru).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Employee deleted".to_string()),
        None,
    )))
}
