//! Synthetic e-commerce operations dataset: clients, orders,
//! communications and the derived order_ops_fact table.

pub mod calendar;
pub mod client_subsystem;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod fact_subsystem;
pub mod name_generator;
pub mod numeric;
pub mod order_subsystem;
pub mod rng;
pub mod store;
pub mod summary;
pub mod types;
