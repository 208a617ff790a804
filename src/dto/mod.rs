pub mod api_response;
pub mod insurance_command_dto;

pub use api_response::ApiResponse;
pub use insurance_command_dto::*;
