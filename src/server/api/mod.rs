pub mod health_controller;
pub mod relay_controller;
pub mod route_controller;
pub mod theme_controller;
pub mod time_controller;
