pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod period;
pub mod router;
pub mod services;
pub mod store;

pub use error::{ScheduleError, ScheduleResult};
pub use models::*;
pub use services::*;
pub use store::{InMemoryScheduleStore, SupabaseScheduleStore};
