pub mod role_service;
pub mod token_service;
pub mod user_service;
