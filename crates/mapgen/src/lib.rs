//! Seeded multi-pass tile map generation with hard-constraint validation and bounded repair.

pub mod balance;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod footprint;
pub mod model;
pub mod pipeline;
pub mod presets;
pub mod registry;
pub mod repair;
pub mod rng;
pub mod scoring;
pub mod types;
pub mod validation;

mod math;
mod passes;

pub use config::{
    ConfigOverrides, GenerationDimensions, GenerationPipelineOptions, RandomGenerationConfig,
    create_default_random_generation_config,
};
pub use diagnostics::{GenerationDiagnostics, GenerationRepairAction, Severity, SoftGoalScore, ValidationIssue};
pub use error::GenerationError;
pub use model::RandomGenerationResult;
pub use passes::RouteStyle;
pub use pipeline::{MapGenerator, PassId, generate_random_map};
pub use presets::{GenerationCatalog, GenerationTemplate, RandomMapArchetype};
pub use registry::TileRegistry;
pub use rng::SeededRng;
pub use scoring::SoftGoalId;
pub use types::*;
pub use validation::ConstraintId;
