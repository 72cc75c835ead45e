//! Credit simulation core: amortization calculator and simulation store.

pub mod calculator;
pub mod config;
pub mod error;
pub mod service;
pub mod simulation;
pub mod store;
pub mod types;
