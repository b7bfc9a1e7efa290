mod employee_dto;
mod query_dto;
mod report_dto;

pub use employee_dto::*;
pub use query_dto::*;
pub use report_dto::*;
