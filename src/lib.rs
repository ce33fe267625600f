pub mod balance;
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod forms;
pub mod routes;
pub mod schemas;
pub mod store;
