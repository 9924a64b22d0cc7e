pub mod cache;
pub mod macros;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{create_redis_client, Cache, CacheKey};
pub use memory::MemoryStore;
pub use postgres::{create_pool, run_migrations, PgStore};
pub use store::{MovieStore, SessionStore, UserStore};
