pub mod config;
pub mod dashboard;
pub mod executor;
pub mod models;
pub mod routes;
