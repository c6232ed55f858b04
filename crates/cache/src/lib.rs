pub mod error;
pub mod redis_cache;

pub use error::{CacheError, Result};
pub use redis_cache::{rate_limit_key, selected_org_key, Cache, CacheConfig};
