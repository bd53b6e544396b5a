//! Upcraft Data -- plan file loading for the quality-upgrade optimizer.
//!
//! Deserializes plan files (RON/JSON/TOML, detected by extension) into the
//! [`schema`] structs, then resolves string references into an immutable
//! [`upcraft_core::Catalog`] plus a [`upcraft_core::PlanConfig`].

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoadError, Format, ResolvedPlan, detect_format, load_plan, resolve_plan};
pub use schema::PlanFile;
