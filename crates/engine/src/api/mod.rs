//! API layer - HTTP entry points.

mod character_routes;
mod class_routes;
pub mod http;
mod material_component_routes;
mod spell_routes;
mod spellbook_routes;
