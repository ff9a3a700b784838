pub mod health_dto;
pub mod route_dto;
