pub mod audit;
pub mod events;
pub mod pool;

pub use events::InsertOutcome;
pub use pool::{create_pool, health_check, run_migrations};
