pub mod auth;
pub mod coordinates;
pub mod employees;
pub mod users;
