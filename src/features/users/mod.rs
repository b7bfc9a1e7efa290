//! Portal accounts and roles.
//!
//! Every endpoint here requires the `admin` role.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | List accounts with their role |
//! | GET | `/api/users/roles` | List roles |
//! | POST | `/api/users` | Create an account |
//! | PUT | `/api/users/{id}` | Update an account |
//! | DELETE | `/api/users/{id}` | Delete an account |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
