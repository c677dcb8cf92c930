pub mod dashboard_controller;
pub mod detail_entry_controller;
