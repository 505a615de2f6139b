// Library exports for the binary and integration tests

pub mod api;
pub mod app_data;
pub mod cli;
pub mod config;
pub mod errors;
pub mod services;
pub mod stores;
pub mod types;

pub use app_data::AppData;
