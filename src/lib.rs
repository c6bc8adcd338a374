pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod shutdown;
pub mod state;
pub mod validation;
