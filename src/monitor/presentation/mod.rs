pub mod dashboard;
pub mod style;
pub mod table;
pub mod vm_view;
