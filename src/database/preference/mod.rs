pub mod model;
pub mod redis_store;

pub use model::*;
pub use redis_store::RedisPreferenceStore;
