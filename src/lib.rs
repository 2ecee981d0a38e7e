pub mod analyzers;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geodesy;
pub mod loader;
pub mod output;
pub mod report;
pub mod types;
