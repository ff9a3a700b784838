pub mod preference;
pub mod redis_connection;

pub use redis_connection::*;
