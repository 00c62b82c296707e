pub mod api;
pub mod api_docs;
pub mod config;
pub mod db;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod seed;
pub mod services;
pub mod utils;

pub use infrastructure::server;
