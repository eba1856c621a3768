pub mod common;
pub mod config;
pub mod indexing;
pub mod performance;
pub mod records;
pub mod types;
pub use self::config::Config;
