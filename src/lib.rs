pub mod config;
pub mod error;
pub mod logging;
pub mod photos;
pub mod search;
pub mod server;
pub mod store;
