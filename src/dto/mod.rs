//! Request and response shapes of the HTTP API

pub mod api_response;
pub mod detail_entry_dto;

pub use api_response::ApiResponse;
