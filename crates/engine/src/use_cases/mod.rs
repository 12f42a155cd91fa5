//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate domain aggregates, the shared per-world store and
//! the infrastructure ports to fulfill user stories.

pub mod claims;

pub use claims::ClaimUseCases;
