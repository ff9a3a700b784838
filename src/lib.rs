pub mod catalog;
pub mod config;
pub mod database;
pub mod logger;
pub mod server;

pub use config::*;
pub use database::*;
pub use logger::*;
pub use server::ApplicationServer;
pub use server::RouteContext;
