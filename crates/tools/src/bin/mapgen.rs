use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mapgen::{
    GenerationCatalog, RandomGenerationResult, create_default_random_generation_config,
    generate_random_map,
};
use tools::args::GenerateArgs;
use tools::{files, render};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one map and print its diagnostics
    Generate(GenerateArgs),
    /// List built-in archetypes and town templates
    Presets,
    /// Print the diagnostics of a result saved with `generate --output`
    Summary {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Presets => {
            list_presets(&GenerationCatalog::builtin());
            Ok(())
        }
        Command::Summary { path } => {
            let result = files::load_result(&path)?;
            print_summary(&result);
            Ok(())
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let catalog = files::load_catalog(args.registry.as_deref())?;
    let overrides = args.overrides()?;
    let config = create_default_random_generation_config(overrides, &catalog)
        .context("Failed to resolve generation config")?;
    let result = generate_random_map(&config, &catalog)
        .with_context(|| format!("Generation failed for seed {}", config.seed))?;

    print_summary(&result);
    if args.ascii {
        print!("{}", render::render_ascii(&result.grid, &catalog.registry));
    }
    if let Some(path) = &args.output {
        files::write_result_atomic(&result, path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_summary(result: &RandomGenerationResult) {
    let diagnostics = &result.diagnostics;
    let summary = diagnostics.summary();

    println!("{} ({}x{})", result.display_name, result.width, result.height);
    println!("Seed: {}", result.seed);
    if let Some(template_id) = &result.template_id {
        println!("Template: {template_id}");
    }
    println!("Fingerprint: {:016x}", result.fingerprint());
    println!("Buildings: {}", result.building_placements.len());
    println!("Primary path cells: {}", result.primary_path_cells.len());
    println!(
        "Passes: {} in {:.2} ms (slowest: {})",
        summary.pass_count,
        summary.total_pass_duration_ms,
        summary.slowest_pass_id.map_or_else(|| "-".to_string(), |id| id.to_string())
    );
    println!(
        "Repairs applied: {}/{}",
        diagnostics.applied_repairs.iter().filter(|action| action.applied).count(),
        diagnostics.applied_repairs.len()
    );
    println!("Hard constraint issues: {}", summary.major_issue_count);
    for issue in &diagnostics.hard_constraint_issues {
        println!("  [{}] {}", issue.id, issue.message);
    }
    for score in &diagnostics.soft_goal_scores {
        println!("  {:<20} {:.3} (weight {:.2})", score.id.as_str(), score.score, score.weight);
    }
    if let Some(overall) = diagnostics.overall_soft_goal_score {
        println!("Overall soft goal score: {overall:.3}");
    }
    for warning in &diagnostics.warnings {
        println!("warning: {warning}");
    }
}

fn list_presets(catalog: &GenerationCatalog) {
    println!("Archetypes:");
    for archetype in &catalog.archetypes {
        let dimensions = archetype.recommended_dimensions;
        println!(
            "  {:<24} {}x{}  {}",
            archetype.id, dimensions.width, dimensions.height, archetype.label
        );
    }
    println!("Templates:");
    for template in &catalog.templates {
        println!("  {:<24} {}", template.id, template.label);
    }
}
