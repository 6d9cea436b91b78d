//! Application service layer - analysis use case, config, scanning, export

pub mod app;
pub mod config;
pub mod constants;
pub mod export;
pub mod scanner;
