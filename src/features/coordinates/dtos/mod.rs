mod coordinate_dto;

pub use coordinate_dto::*;
