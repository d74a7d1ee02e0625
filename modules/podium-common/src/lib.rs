pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiKey, Config};
pub use error::{SearchError, GENERIC_USER_MESSAGE};
pub use types::*;
