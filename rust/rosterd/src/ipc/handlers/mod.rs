pub mod backup_exchange;
pub mod core;
pub mod csv_exchange;
pub mod students;
