pub mod constants;
pub mod induk_unit;
pub mod test_helpers;
pub mod types;
pub mod validation;
