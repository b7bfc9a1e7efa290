use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::coordinates::handlers;
use crate::features::coordinates::services::CoordinateService;

pub fn routes(service: Arc<CoordinateService>) -> Router {
    Router::new()
        .route(
            "/api/coordinates",
            get(handlers::list_coordinates).post(handlers::create_coordinate),
        )
        .route(
            "/api/coordinates/{id}",
            get(handlers::get_coordinate)
                .put(handlers::update_coordinate)
                .delete(handlers::delete_coordinate),
        )
        .with_state(service)
}
