//! Collects RabbitMQ management-API statistics and turns them into
//! Open-Falcon gauge records.

pub mod collectors;
pub mod config;
pub mod derive;
pub mod errors;
pub mod falcon;
pub mod management;
pub mod metric;
pub mod snapshot;
