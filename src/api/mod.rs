pub mod health;
pub mod publish;
pub mod query;
pub mod routes;

pub use routes::{create_router, AppState};
