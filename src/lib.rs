//! Taskdeck: the core of a task (todo) management backend.
//!
//! This crate validates and persists task records, keeps their coupled
//! completion state consistent under partial updates, and answers filtered,
//! sorted and paginated queries together with collection statistics.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task records, lifecycle operations and queries

pub mod task;
