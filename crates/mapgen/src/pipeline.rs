//! Pass registry and the orchestrator that runs one generation end to end.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::balance;
use crate::config::RandomGenerationConfig;
use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::model::RandomGenerationResult;
use crate::passes::{
    biomes, buildings, carve_paths, districts, encounters, entities, finalize, initialize, repair,
    validate,
};
use crate::presets::GenerationCatalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassId {
    Initialize,
    CarvePrimaryPaths,
    PaintBiomes,
    ReserveDistricts,
    PlaceBuildings,
    PlaceEncounters,
    PlaceInteractivesAndEntities,
    Balance,
    Validate,
    Repair,
    Finalize,
}

impl PassId {
    /// Every pass, in the default execution order.
    pub const ALL: [PassId; 11] = [
        PassId::Initialize,
        PassId::CarvePrimaryPaths,
        PassId::PaintBiomes,
        PassId::ReserveDistricts,
        PassId::PlaceBuildings,
        PassId::PlaceEncounters,
        PassId::PlaceInteractivesAndEntities,
        PassId::Balance,
        PassId::Validate,
        PassId::Repair,
        PassId::Finalize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PassId::Initialize => "initialize",
            PassId::CarvePrimaryPaths => "carvePrimaryPaths",
            PassId::PaintBiomes => "paintBiomes",
            PassId::ReserveDistricts => "reserveDistricts",
            PassId::PlaceBuildings => "placeBuildings",
            PassId::PlaceEncounters => "placeEncounters",
            PassId::PlaceInteractivesAndEntities => "placeInteractivesAndEntities",
            PassId::Balance => "balance",
            PassId::Validate => "validate",
            PassId::Repair => "repair",
            PassId::Finalize => "finalize",
        }
    }

    fn run(
        self,
        context: &mut GenerationContext<'_>,
        diagnostics: &mut GenerationDiagnostics,
    ) -> Result<(), GenerationError> {
        match self {
            PassId::Initialize => initialize::run(context, diagnostics),
            PassId::CarvePrimaryPaths => carve_paths::run(context, diagnostics),
            PassId::PaintBiomes => biomes::run(context, diagnostics),
            PassId::ReserveDistricts => districts::run(context, diagnostics),
            PassId::PlaceBuildings => buildings::run(context, diagnostics),
            PassId::PlaceEncounters => encounters::run(context, diagnostics),
            PassId::PlaceInteractivesAndEntities => entities::run(context, diagnostics),
            PassId::Balance => balance::run(context, diagnostics),
            PassId::Validate => validate::run(context, diagnostics),
            PassId::Repair => repair::run(context, diagnostics),
            PassId::Finalize => finalize::run(context, diagnostics),
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassId {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PassId::ALL
            .into_iter()
            .find(|pass| pass.as_str() == value)
            .ok_or_else(|| GenerationError::UnknownPass(value.to_string()))
    }
}

/// Runs generations against one catalog; holds no per-run state.
pub struct MapGenerator<'a> {
    catalog: &'a GenerationCatalog,
}

impl<'a> MapGenerator<'a> {
    pub fn new(catalog: &'a GenerationCatalog) -> Self {
        Self { catalog }
    }

    /// Non-empty config override, else the archetype's order, else every pass in default order.
    pub fn resolve_pass_order(
        &self,
        config: &RandomGenerationConfig,
    ) -> Result<Vec<PassId>, GenerationError> {
        if let Some(order) = config.pipeline.pass_order_override.as_ref().filter(|order| !order.is_empty()) {
            return Ok(order.clone());
        }
        let archetype = self.catalog.archetype(&config.archetype_id)?;
        if archetype.pass_order.is_empty() {
            return Ok(PassId::ALL.to_vec());
        }
        Ok(archetype.pass_order.clone())
    }

    pub fn generate(
        &self,
        config: &RandomGenerationConfig,
    ) -> Result<RandomGenerationResult, GenerationError> {
        let mut context = GenerationContext::new(config, self.catalog)?;
        let mut diagnostics = GenerationDiagnostics::default();
        let pass_order = self.resolve_pass_order(config)?;

        let disabled: Vec<&str> =
            config.disabled_constraints().into_iter().map(|constraint| constraint.as_str()).collect();
        if !disabled.is_empty() {
            diagnostics.warn(format!("Hard constraints disabled by config: {}", disabled.join(", ")));
        }

        for pass_id in pass_order {
            let started = Instant::now();
            pass_id.run(&mut context, &mut diagnostics)?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            log::debug!("pass {pass_id} finished in {elapsed_ms:.3}ms");
            diagnostics.record_pass_duration(pass_id, elapsed_ms);
        }

        log::info!(
            "generated {}x{} {} map for seed {:?} with {} warning(s) and {} issue(s)",
            context.width(),
            context.height(),
            context.archetype.id,
            config.seed,
            diagnostics.warnings.len(),
            diagnostics.hard_constraint_issues.len()
        );
        Ok(RandomGenerationResult::from_run(context, diagnostics))
    }
}

pub fn generate_random_map(
    config: &RandomGenerationConfig,
    catalog: &GenerationCatalog,
) -> Result<RandomGenerationResult, GenerationError> {
    MapGenerator::new(catalog).generate(config)
}
