use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::employees::handlers;
use crate::features::employees::services::EmployeeService;

pub fn routes(service: Arc<EmployeeService>) -> Router {
    Router::new()
        .route(
            "/api/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route("/api/employees/induk-units", get(handlers::induk_units))
        .route("/api/employees/statistics", get(handlers::employee_statistics))
        .route("/api/employees/heatmap", get(handlers::heatmap))
        .route("/api/employees/by-location", get(handlers::by_location))
        .route("/api/employees/distinct", get(handlers::distinct_values))
        .route("/api/employees/jabatan-options", get(handlers::jabatan_options))
        .route(
            "/api/employees/{nip_baru}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .with_state(service)
}
