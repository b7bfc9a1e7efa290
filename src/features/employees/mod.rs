//! Employee (pegawai) records of the NTB regional office.
//!
//! Each listing is enriched with two derived values that are never stored:
//! the induk unit (see [`crate::shared::induk_unit`]) and the retirement
//! status relative to today in WITA.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Access | Description |
//! |--------|----------|--------|-------------|
//! | GET | `/api/employees` | any | Filtered, ordered listing |
//! | GET | `/api/employees/induk-units` | any | Canonical induk units |
//! | GET | `/api/employees/statistics` | any | Total / aktif / pensiun counts |
//! | GET | `/api/employees/heatmap` | any | Counts per unit with coordinates |
//! | GET | `/api/employees/by-location` | any | Employees of one unit with statistics |
//! | GET | `/api/employees/distinct` | any | Distinct values of a whitelisted column |
//! | GET | `/api/employees/jabatan-options` | any | Position code/name pairs |
//! | GET | `/api/employees/{nip_baru}` | any | One employee |
//! | POST | `/api/employees` | admin | Create |
//! | PUT | `/api/employees/{nip_baru}` | admin, operator | Partial update |
//! | DELETE | `/api/employees/{nip_baru}` | admin | Delete |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EmployeeService;
