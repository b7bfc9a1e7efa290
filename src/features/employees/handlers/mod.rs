pub mod employee_handler;

pub use employee_handler::{
    __path_by_location, __path_create_employee, __path_delete_employee, __path_distinct_values,
    __path_employee_statistics, __path_get_employee, __path_heatmap, __path_induk_units,
    __path_jabatan_options, __path_list_employees, __path_update_employee, by_location,
    create_employee, delete_employee, distinct_values, employee_statistics, get_employee, heatmap,
    induk_units, jabatan_options, list_employees, update_employee,
};
