pub mod app;
pub mod config;
pub mod console;
pub mod effects;
pub mod persistence;
