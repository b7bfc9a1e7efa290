use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::coordinates::{dtos as coordinates_dtos, handlers as coordinates_handlers};
use crate::features::employees::{dtos as employees_dtos, handlers as employees_handlers};
use crate::features::employees::models::EmployeeStatus;
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::induk_unit::IndukUnit;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::get_me,
        auth_handlers::refresh,
        // Users (admin)
        users_handlers::list_users,
        users_handlers::list_roles,
        users_handlers::create_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        // Employees
        employees_handlers::list_employees,
        employees_handlers::induk_units,
        employees_handlers::employee_statistics,
        employees_handlers::heatmap,
        employees_handlers::by_location,
        employees_handlers::distinct_values,
        employees_handlers::jabatan_options,
        employees_handlers::get_employee,
        employees_handlers::create_employee,
        employees_handlers::update_employee,
        employees_handlers::delete_employee,
        // Coordinates
        coordinates_handlers::list_coordinates,
        coordinates_handlers::get_coordinate,
        coordinates_handlers::create_coordinate,
        coordinates_handlers::update_coordinate,
        coordinates_handlers::delete_coordinate,
    ),
    components(
        schemas(
            // Shared
            Meta,
            IndukUnit,
            EmployeeStatus,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::AuthUserDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::AuthUserDto>,
            // Users
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::UserResponseDto,
            users_dtos::RoleResponseDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::RoleResponseDto>>,
            // Employees
            employees_dtos::EmployeeResponseDto,
            employees_dtos::CreateEmployeeDto,
            employees_dtos::UpdateEmployeeDto,
            employees_dtos::EmployeeStatisticsDto,
            employees_dtos::HeatmapPointDto,
            employees_dtos::ByLocationResponseDto,
            employees_dtos::JabatanOptionDto,
            ApiResponse<Vec<employees_dtos::EmployeeResponseDto>>,
            ApiResponse<employees_dtos::EmployeeResponseDto>,
            ApiResponse<employees_dtos::EmployeeStatisticsDto>,
            ApiResponse<Vec<employees_dtos::HeatmapPointDto>>,
            ApiResponse<employees_dtos::ByLocationResponseDto>,
            ApiResponse<Vec<employees_dtos::JabatanOptionDto>>,
            ApiResponse<Vec<IndukUnit>>,
            ApiResponse<Vec<String>>,
            // Coordinates
            coordinates_dtos::UpsertCoordinateDto,
            coordinates_dtos::UpdateCoordinateDto,
            coordinates_dtos::CoordinateResponseDto,
            ApiResponse<Vec<coordinates_dtos::CoordinateResponseDto>>,
            ApiResponse<coordinates_dtos::CoordinateResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Login and tokens"),
        (name = "users", description = "Account management (admin only)"),
        (name = "employees", description = "Employee records, induk units and reports"),
        (name = "coordinates", description = "Map coordinates of induk units"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "SDM Kanwil NTB API",
        version = "0.1.0",
        description = "API documentation for the SDM Kanwil NTB data portal",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
