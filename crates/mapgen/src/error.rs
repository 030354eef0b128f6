//! Fatal configuration errors that abort a generation run.

use thiserror::Error;

use crate::types::TileId;

/// Problems that indicate a broken config, preset or registry rather than unlucky placement.
/// Shortfalls during placement are reported through diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("map dimensions {width}x{height} must each lie within {min}..={max}")]
    InvalidDimensions { width: u32, height: u32, min: u32, max: u32 },
    #[error("unknown archetype id `{0}`")]
    UnknownArchetype(String),
    #[error("unknown generation template id `{0}`")]
    UnknownTemplate(String),
    #[error("unknown building id `{0}`")]
    UnknownBuilding(String),
    #[error("building `{0}` has an empty footprint")]
    EmptyFootprint(String),
    #[error("unknown generation pass id `{0}`")]
    UnknownPass(String),
    #[error("unknown hard constraint id `{0}`")]
    UnknownConstraint(String),
    #[error("cannot pick from an empty set")]
    EmptyChoice,
    #[error("base fill tile id {0} is not in the tile registry")]
    UnknownBaseTile(TileId),
    #[error("invalid tile registry: {0}")]
    InvalidRegistry(String),
}
