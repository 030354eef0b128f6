use anyhow::{Context, Result};
use clap::Parser;
use mapgen::config::{MAX_DIMENSION, MIN_DIMENSION};
use mapgen::footprint::RotatedFootprint;
use mapgen::{
    ConfigOverrides, GenerationCatalog, GenerationDimensions, RandomGenerationResult,
    create_default_random_generation_config, generate_random_map,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    iterations: u32,
}

fn draw_dimension(rng: &mut ChaCha8Rng) -> u32 {
    MIN_DIMENSION + (rng.next_u64() % u64::from(MAX_DIMENSION - MIN_DIMENSION + 1)) as u32
}

fn assert_invariants(catalog: &GenerationCatalog, result: &RandomGenerationResult) -> Result<()> {
    assert_eq!(result.grid.len(), result.height as usize, "Invariant failed: grid height");
    for row in &result.grid {
        assert_eq!(row.len(), result.width as usize, "Invariant failed: grid width");
        for &tile_id in row {
            assert!(catalog.registry.is_known(tile_id), "Invariant failed: unknown tile {tile_id}");
        }
    }

    for placement in &result.building_placements {
        let building = catalog.registry.building(&placement.building_id)?;
        let footprint = RotatedFootprint::new(building, placement.rotation)?;
        for cell in footprint.cells_at(placement.anchor) {
            assert!(
                cell.point.x >= 0
                    && cell.point.y >= 0
                    && cell.point.x < result.width as i32
                    && cell.point.y < result.height as i32,
                "Invariant failed: {} leaks out of the map at {}",
                placement.building_id,
                cell.point
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} maps...", args.seed, args.iterations);
    let catalog = GenerationCatalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut unresolved = 0usize;

    for iteration in 0..args.iterations {
        let archetype = &catalog.archetypes[rng.next_u64() as usize % catalog.archetypes.len()];
        let dimensions = GenerationDimensions {
            width: draw_dimension(&mut rng),
            height: draw_dimension(&mut rng),
        };
        let seed = format!("fuzz-{:016x}", rng.next_u64());

        let config = create_default_random_generation_config(
            ConfigOverrides {
                seed: Some(seed.clone()),
                archetype_id: Some(archetype.id.clone()),
                dimensions: Some(dimensions),
                ..ConfigOverrides::default()
            },
            &catalog,
        )?;
        let first = generate_random_map(&config, &catalog)
            .with_context(|| format!("iteration {iteration}: seed {seed} failed"))?;
        let second = generate_random_map(&config, &catalog)?;

        assert_eq!(
            first.fingerprint(),
            second.fingerprint(),
            "Invariant failed: seed {seed} on {} is not deterministic",
            archetype.id
        );
        assert_invariants(&catalog, &first)?;

        if !first.diagnostics.hard_constraint_issues.is_empty() {
            unresolved += 1;
            log::warn!(
                "{seed} {} {}x{}: {} unresolved issue(s)",
                archetype.id,
                dimensions.width,
                dimensions.height,
                first.diagnostics.hard_constraint_issues.len()
            );
        }
    }

    println!("Fuzzing completed successfully ({unresolved} map(s) with unresolved issues).");
    Ok(())
}
