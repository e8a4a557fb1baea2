pub mod api;
pub mod app;
pub mod config;
pub mod dates;
pub mod db;
pub mod services;
