use std::thread;

use mapgen::{
    ConfigOverrides, GenerationCatalog, GenerationDimensions, RandomGenerationResult,
    create_default_random_generation_config, generate_random_map,
};

fn generate(seed: &str, archetype: &str, template: Option<&str>) -> RandomGenerationResult {
    let catalog = GenerationCatalog::builtin();
    let config = create_default_random_generation_config(
        ConfigOverrides {
            seed: Some(seed.to_string()),
            archetype_id: Some(archetype.to_string()),
            template_id: template.map(str::to_string),
            ..ConfigOverrides::default()
        },
        &catalog,
    )
    .expect("config should resolve");
    generate_random_map(&config, &catalog).expect("generation should succeed")
}

#[test]
fn identical_seeds_produce_identical_maps() {
    let archetypes = [
        "town_route_basic",
        "coastal_town_route",
        "forest_town_route",
        "meadow_outskirts_route",
        "canyon_corridor_route",
    ];
    for archetype in archetypes {
        let left = generate("determinism", archetype, None);
        let right = generate("determinism", archetype, None);

        assert_eq!(left.grid, right.grid, "{archetype} grids must match");
        assert_eq!(left.building_placements, right.building_placements);
        assert_eq!(left.diagnostics.warnings, right.diagnostics.warnings);
        assert_eq!(left.diagnostics.hard_constraint_issues, right.diagnostics.hard_constraint_issues);
        assert_eq!(left.diagnostics.applied_repairs, right.diagnostics.applied_repairs);
        assert_eq!(left.diagnostics.soft_goal_scores, right.diagnostics.soft_goal_scores);
        assert_eq!(left.fingerprint(), right.fingerprint(), "identical runs must hash identically");
    }
}

#[test]
fn different_seeds_produce_different_fingerprints() {
    let first = generate("alpha", "town_route_basic", None);
    let second = generate("beta", "town_route_basic", None);
    assert_ne!(first.fingerprint(), second.fingerprint());
}

#[test]
fn templates_change_the_output_but_stay_deterministic() {
    let plain = generate("template-check", "town_route_basic", None);
    let templated = generate("template-check", "town_route_basic", Some("northern_crossing"));
    let again = generate("template-check", "town_route_basic", Some("northern_crossing"));

    assert_eq!(templated.template_id.as_deref(), Some("northern_crossing"));
    assert_eq!(templated.fingerprint(), again.fingerprint());
    assert_ne!(plain.fingerprint(), templated.fingerprint());
}

#[test]
fn concurrent_runs_match_sequential_runs() {
    let seeds = ["c-1", "c-2", "c-3", "c-4"];
    let sequential: Vec<u64> =
        seeds.iter().map(|seed| generate(seed, "forest_town_route", None).fingerprint()).collect();

    let concurrent: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .iter()
            .map(|seed| scope.spawn(move || generate(seed, "forest_town_route", None).fingerprint()))
            .collect();
        handles.into_iter().map(|handle| handle.join().expect("worker should not panic")).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn explicit_dimensions_override_the_archetype_size() {
    let catalog = GenerationCatalog::builtin();
    let config = create_default_random_generation_config(
        ConfigOverrides {
            seed: Some("sized".into()),
            dimensions: Some(GenerationDimensions { width: 40, height: 22 }),
            ..ConfigOverrides::default()
        },
        &catalog,
    )
    .expect("config should resolve");
    let result = generate_random_map(&config, &catalog).expect("generation should succeed");

    assert_eq!((result.width, result.height), (40, 22));
    assert_eq!(result.grid.len(), 22);
    assert!(result.grid.iter().all(|row| row.len() == 40));
}
