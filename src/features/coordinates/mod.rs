//! Map coordinates of the induk units.
//!
//! One coordinate per canonical unit. The employee heatmap only shows units
//! that have one.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Access | Description |
//! |--------|----------|--------|-------------|
//! | GET | `/api/coordinates` | any | List coordinates |
//! | GET | `/api/coordinates/{id}` | any | Get coordinate |
//! | POST | `/api/coordinates` | admin | Create or replace by induk unit |
//! | PUT | `/api/coordinates/{id}` | admin | Move a coordinate |
//! | DELETE | `/api/coordinates/{id}` | admin | Delete a coordinate |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CoordinateService;
