pub mod config;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
