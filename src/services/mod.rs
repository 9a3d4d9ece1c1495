pub mod api_client;
pub mod gateway;
pub mod labels;
pub mod session_service;
pub mod settings_service;
