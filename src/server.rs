pub mod config;
pub mod endpoints;
pub mod server_runner;
