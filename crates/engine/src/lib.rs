//! Claimward Engine library.
//!
//! Async service layer over the claimward domain model.
//!
//! ## Structure
//!
//! - `stores/` - Shared per-world region state behind async locks
//! - `use_cases/` - Claim user stories (define, change, flag, members, ...)
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
