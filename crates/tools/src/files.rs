//! Reading config and registry inputs, writing result JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mapgen::{ConfigOverrides, GenerationCatalog, RandomGenerationResult, TileRegistry};

pub fn load_overrides(path: &Path) -> Result<ConfigOverrides> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// The built-in catalog, with its tiles and buildings swapped for `registry` when given.
pub fn load_catalog(registry: Option<&Path>) -> Result<GenerationCatalog> {
    let Some(path) = registry else {
        return Ok(GenerationCatalog::builtin());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry file: {}", path.display()))?;
    let registry = TileRegistry::from_json(&json)
        .with_context(|| format!("Invalid tile registry: {}", path.display()))?;
    Ok(GenerationCatalog::with_registry(registry))
}

pub fn write_result_atomic(result: &RandomGenerationResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
    fs::write(&tmp_path, json)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move result into place: {}", path.display()))?;
    Ok(())
}

pub fn load_result(path: &Path) -> Result<RandomGenerationResult> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read result file: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| "Failed to deserialize result JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen::{create_default_random_generation_config, generate_random_map};
    use tempfile::tempdir;

    #[test]
    fn result_atomic_write_and_load() {
        let catalog = GenerationCatalog::builtin();
        let config = create_default_random_generation_config(
            ConfigOverrides { seed: Some("files".to_string()), ..ConfigOverrides::default() },
            &catalog,
        )
        .expect("config");
        let result = generate_random_map(&config, &catalog).expect("generate");

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("maps").join("files.json");
        write_result_atomic(&result, &path).expect("write");
        let loaded = load_result(&path).expect("load");

        assert_eq!(loaded.grid, result.grid);
        assert_eq!(loaded.building_placements, result.building_placements);
        assert_eq!(loaded.seed, "files");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn non_result_json_fails_to_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("not-a-map.json");
        fs::write(&path, "{\"seed\": \"only\"}").expect("write json");

        let err = load_result(&path).expect_err("incomplete result");
        assert!(format!("{err:#}").contains("Failed to deserialize result JSON"));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "seed = \"x\"\nbiome = \"desert\"\n").expect("write config");

        let err = load_overrides(&path).expect_err("unknown key");
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn config_file_reads_policy_and_pass_order() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("policy.toml");
        fs::write(
            &path,
            "passOrderOverride = [\"initialize\", \"validate\"]\n\n\
             [hardConstraintPolicy]\nspawnSafety = false\n",
        )
        .expect("write config");

        let overrides = load_overrides(&path).expect("load");
        let order = overrides.pass_order_override.expect("pass order");
        assert_eq!(order.len(), 2);
        let policy = overrides.hard_constraint_policy.expect("policy");
        assert_eq!(policy.len(), 1);
        assert!(policy.values().all(|&enabled| !enabled));
    }

    #[test]
    fn missing_registry_falls_back_to_builtin() {
        let catalog = load_catalog(None).expect("catalog");
        assert_eq!(catalog, GenerationCatalog::builtin());

        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        let err = load_catalog(Some(missing.as_path())).expect_err("missing file");
        assert!(format!("{err:#}").contains("Failed to read registry file"));
    }
}
