#![doc = "The `tasks_api` library crate."]
#![doc = ""]
#![doc = "This crate contains the allow-listed query engine, the user and task domain"]
#![doc = "services built on it, the HTTP routes, configuration and error handling."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;

pub use crate::error::AppError;
