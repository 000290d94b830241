pub mod bootstrap;
pub mod error;
pub mod log_bridge;
pub mod logger;

pub use bootstrap::build_notifier;
pub use error::{Result, ServerError};
