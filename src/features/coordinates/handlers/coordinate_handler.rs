use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::coordinates::dtos::{
    CoordinateResponseDto, UpdateCoordinateDto, UpsertCoordinateDto,
};
use crate::features::coordinates::services::CoordinateService;
use crate::shared::types::{ApiResponse, Meta};

/// List coordinates ordered by induk unit
#[utoipa::path(
    get,
    path = "/api/coordinates",
    responses(
        (status = 200, description = "List of coordinates", body = ApiResponse<Vec<CoordinateResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "coordinates"
)]
pub async fn list_coordinates(
    _user: AuthenticatedUser,
    State(service): State<Arc<CoordinateService>>,
) -> Result<Json<ApiResponse<Vec<CoordinateResponseDto>>>> {
    let coordinates = service.list().await?;
    let total = coordinates.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(coordinates),
        None,
        Some(Meta { total }),
    )))
}

/// Get coordinate by ID
#[utoipa::path(
    get,
    path = "/api/coordinates/{id}",
    params(
        ("id" = Uuid, Path, description = "Coordinate ID")
    ),
    responses(
        (status = 200, description = "Coordinate found", body = ApiResponse<CoordinateResponseDto>),
        (status = 404, description = "Coordinate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "coordinates"
)]
pub async fn get_coordinate(
    _user: AuthenticatedUser,
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CoordinateResponseDto>>> {
    let coordinate = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(coordinate), None, None)))
}

/// Create or replace the coordinate of an induk unit
#[utoipa::path(
    post,
    path = "/api/coordinates",
    request_body = UpsertCoordinateDto,
    responses(
        (status = 201, description = "Coordinate saved", body = ApiResponse<CoordinateResponseDto>),
        (status = 400, description = "Validation error or unknown induk unit"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "coordinates"
)]
pub async fn create_coordinate(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CoordinateService>>,
    AppJson(dto): AppJson<UpsertCoordinateDto>,
) -> Result<(StatusCode, Json<ApiResponse<CoordinateResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    dto.induk()?;

    let coordinate = service.upsert(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(coordinate),
            Some("Coordinate saved".to_string()),
            None,
        )),
    ))
}

/// Move an existing coordinate
#[utoipa::path(
    put,
    path = "/api/coordinates/{id}",
    params(
        ("id" = Uuid, Path, description = "Coordinate ID")
    ),
    request_body = UpdateCoordinateDto,
    responses(
        (status = 200, description = "Coordinate updated", body = ApiResponse<CoordinateResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Coordinate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "coordinates"
)]
pub async fn update_coordinate(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCoordinateDto>,
) -> Result<Json<ApiResponse<CoordinateResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let coordinate = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(coordinate),
        Some("Coordinate updated".to_string()),
        None,
    )))
}

/// Delete a coordinate
#[utoipa::path(
    delete,
    path = "/api/coordinates/{id}",
    params(
        ("id" = Uuid, Path, description = "Coordinate ID")
    ),
    responses(
        (status = 200, description = "Coordinate deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Coordinate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "coordinates"
)]
pub async fn delete_coordinate(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Coordinate deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::coordinates::{routes, CoordinateService};
    use crate::shared::test_helpers::{lazy_pool, with_role_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn server(role: &str) -> TestServer {
        let service = Arc::new(CoordinateService::new(lazy_pool()));
        TestServer::new(with_role_auth(routes::routes(service), role)).unwrap()
    }

    #[tokio::test]
    async fn test_writes_require_admin() {
        let server = server("operator");
        let body = json!({
            "induk_unit": "Kantor Kementerian Agama Kota Mataram",
            "latitude": -8.58,
            "longitude": 116.12
        });

        server
            .post("/api/coordinates")
            .json(&body)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .put(&format!("/api/coordinates/{}", Uuid::new_v4()))
            .json(&json!({ "latitude": 0.0, "longitude": 0.0 }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&format!("/api/coordinates/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_latitude() {
        server("admin")
            .post("/api/coordinates")
            .json(&json!({
                "induk_unit": "Kantor Kementerian Agama Kota Mataram",
                "latitude": 91.0,
                "longitude": 116.12
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_unit() {
        let response = server("admin")
            .post("/api/coordinates")
            .json(&json!({
                "induk_unit": "Kantor Kementerian Agama Kabupaten Sleman",
                "latitude": -7.7,
                "longitude": 110.3
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }
}
