pub mod response;
pub mod role_dto;
pub mod user_dto;
