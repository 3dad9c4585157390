pub mod app;
pub mod config;
pub mod error;
pub mod http_client;
pub mod redis_store;
pub mod setup;
