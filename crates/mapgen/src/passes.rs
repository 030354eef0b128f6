//! Content passes; each mutates the shared context and appends to diagnostics.

pub(crate) mod biomes;
pub(crate) mod buildings;
pub(crate) mod carve_paths;
pub(crate) mod districts;
pub(crate) mod encounters;
pub(crate) mod entities;
pub(crate) mod finalize;
pub(crate) mod initialize;
pub(crate) mod repair;
pub(crate) mod validate;

pub use carve_paths::RouteStyle;
