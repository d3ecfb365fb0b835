//! Grimoire Engine library.
//!
//! This crate contains all server-side code for the Grimoire spellcasting
//! backend.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
