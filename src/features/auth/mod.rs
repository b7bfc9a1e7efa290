//! Authentication and role-based access.
//!
//! Access tokens are HS256 JWTs issued by this service on login. They are
//! stateless: nothing is stored server side, a token stays valid until it
//! expires. Name and role are not taken from the token; the account is
//! re-read on every request.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/auth/login` | No | Exchange email/name + password for a token |
//! | GET | `/api/auth/me` | Yes | Current user |
//! | POST | `/api/auth/refresh` | Yes | Issue a fresh token |

mod accounts;
mod password;
mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use accounts::AccountLookup;
pub use password::PasswordHasher;
pub use validator::JwtValidator;
