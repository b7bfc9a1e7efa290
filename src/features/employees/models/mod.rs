mod employee;

pub use employee::{today_wita, Employee, EmployeeStatus};
