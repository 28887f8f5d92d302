pub mod config;
pub mod error;
pub mod types;

pub use config::ReaderConfig;
pub use error::{MusterError, Result};
