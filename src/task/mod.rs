//! Task management: the task record model and its query engine.
//!
//! Every mutation funnels through the same validation and coupled-state
//! rules before persistence, and every read goes through one declarative
//! filter, sort and window vocabulary. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Response rendering in [`api`]

pub mod adapters;
pub mod api;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
