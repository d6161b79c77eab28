//! API endpoint handlers.

pub mod health;
pub mod metrics;
pub mod symptoms;
