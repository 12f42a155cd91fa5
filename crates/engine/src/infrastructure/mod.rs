//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod chunk_index;
pub mod json_store;
pub mod memory_store;
pub mod permissions;
pub mod ports;
pub mod settings;
pub mod telemetry;
