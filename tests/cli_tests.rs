//! Integration tests for the materia CLI
//!
//! These tests run the materia binary against a formula pool on disk.

mod support;

use predicates::prelude::*;
use tempfile::tempdir;

use crate::support::{materia, setup_pool, write_file};

// ============================================================================
// Help and Version tests
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("similar"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("normalize"));
}

#[test]
fn test_version_flag() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("materia "));
}

#[test]
fn test_no_command_prints_banner() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("materia --help"));
}

#[test]
fn test_unknown_format_is_usage_error() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "yaml", "list"])
        .assert()
        .code(2);
}

// ============================================================================
// similar
// ============================================================================

#[test]
fn test_similar_human() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["similar", "source-formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Source Formula (source-formula) - 3 ingredients, compared against 4 formulas",
        ))
        .stdout(predicate::str::contains("79.5  Target Formula (target-formula)  shared 2/3"))
        .stdout(predicate::str::contains("69.0  Equal Parts (equal-parts)  shared 2/5"))
        .stdout(predicate::str::contains("unrelated").not())
        .stdout(predicate::str::contains("empty-formula").not());
}

#[test]
fn test_similar_verbose_lists_shared_ingredients() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["similar", "source-formula", "--verbose", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ginger 30.0% / 40.0%"))
        .stdout(predicate::str::contains("Licorice 20.0% / 60.0%"));
}

#[test]
fn test_similar_json() {
    let (dir, pool) = setup_pool();
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "source-formula"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lookup = &json[0];
    assert_eq!(lookup["formula_id"], "source-formula");
    assert_eq!(lookup["status"], "ranked");
    assert_eq!(lookup["total_compared"], 4);
    assert_eq!(lookup["min_similarity"], 10);
    assert_eq!(lookup["max_results"], 5);

    let results = lookup["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["formula_id"], "target-formula");
    assert_eq!(results[0]["score"], 79.5);
    assert_eq!(results[0]["shared_herb_count"], 2);
    assert_eq!(results[0]["total_herbs_in_comparison"], 3);
    assert_eq!(results[0]["shared_ingredients"][0]["id"], "ginger");
    assert_eq!(results[1]["formula_id"], "equal-parts");
    assert_eq!(results[1]["score"], 69.0);
}

#[test]
fn test_similar_threshold_and_limit() {
    let (dir, pool) = setup_pool();

    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "source-formula"])
        .args(["--min-similarity", "70"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["results"].as_array().unwrap().len(), 1);
    assert_eq!(json[0]["min_similarity"], 70);

    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "source-formula", "--max-results", "1"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = json[0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["formula_id"], "target-formula");
}

#[test]
fn test_similar_multiple_ids() {
    let (dir, pool) = setup_pool();
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "target-formula", "equal-parts"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lookups = json.as_array().unwrap();
    assert_eq!(lookups.len(), 2);
    assert_eq!(lookups[0]["formula_id"], "target-formula");
    assert_eq!(lookups[1]["formula_id"], "equal-parts");
}

#[test]
fn test_similar_records() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "records", "similar", "source-formula", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "H materia=1 records=1 source=",
        ))
        .stdout(predicate::str::contains("mode=similar formulas=1"))
        .stdout(predicate::str::contains(
            "F source-formula \"Source Formula\" status=ranked ingredients=3 compared=4 min=10 max=1 results=1",
        ))
        .stdout(predicate::str::contains(
            "R source-formula target-formula \"Target Formula\" score=79.5 shared=2 union=3",
        ))
        .stdout(predicate::str::contains(
            "I target-formula ginger \"Ginger\" source=30.0 target=40.0",
        ));
}

#[test]
fn test_similar_without_ingredients() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["similar", "empty-formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ingredients listed"));

    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "empty-formula"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["status"], "no_ingredients");
    assert!(json[0]["results"].as_array().unwrap().is_empty());
}

#[test]
fn test_similar_unknown_formula() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["similar", "missing-formula"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("formula not found: missing-formula"));
}

#[test]
fn test_similar_unknown_formula_json_envelope() {
    let (dir, pool) = setup_pool();
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "similar", "missing-formula"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["error"]["code"], 3);
    assert_eq!(json["error"]["type"], "formula_not_found");
}

#[test]
fn test_similar_requires_id_json_envelope() {
    let dir = tempdir().unwrap();
    let output = materia(dir.path())
        .args(["--format", "json", "similar"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["error"]["type"], "usage_error");
}

// ============================================================================
// compare / normalize / list
// ============================================================================

#[test]
fn test_compare_human() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["compare", "source-formula", "target-formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Source Formula (source-formula) vs Target Formula (target-formula): 79.5",
        ))
        .stdout(predicate::str::contains("shared 2/3"));
}

#[test]
fn test_compare_json_breakdown() {
    let (dir, pool) = setup_pool();
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "compare", "source-formula", "unrelated"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"], 0.0);
    assert_eq!(json["shared_herb_count"], 0);
    assert_eq!(json["total_herbs_in_comparison"], 4);
    assert_eq!(json["target"]["title"], "Unrelated \"Stone\" Formula");
}

#[test]
fn test_compare_unknown_target() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["compare", "source-formula", "nope"])
        .assert()
        .code(3);
}

#[test]
fn test_normalize_equal_distribution() {
    let (dir, pool) = setup_pool();
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "normalize", "equal-parts"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ingredients = json["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 4);
    for ingredient in ingredients {
        assert_eq!(ingredient["percentage"], 25.0);
    }
}

#[test]
fn test_normalize_records() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "records", "normalize", "source-formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "F source-formula \"Source Formula\" ingredients=3",
        ))
        .stdout(predicate::str::contains(
            "I source-formula cinnamon \"Cinnamon\" pct=50.0",
        ));
}

#[test]
fn test_list_human_and_records() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("source-formula Source Formula (3 ingredients)"))
        .stdout(predicate::str::contains("empty-formula Empty Formula (0 ingredients)"));

    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "records", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode=list formulas=5"))
        .stdout(predicate::str::contains(
            r#"F unrelated "Unrelated \"Stone\" Formula" ingredients=1"#,
        ));
}

// ============================================================================
// Content sources and configuration
// ============================================================================

#[test]
fn test_missing_content_source() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no content source configured"));
}

#[test]
fn test_unreadable_pool_file() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .arg("--source")
        .arg(dir.path().join("absent.json"))
        .arg("list")
        .assert()
        .code(1);
}

#[test]
fn test_malformed_pool_is_data_error() {
    let dir = tempdir().unwrap();
    let pool = write_file(&dir, "broken.json", "{ not json");
    let output = materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["error"]["type"], "invalid_content");
}

#[test]
fn test_config_file_supplies_source_and_defaults() {
    let (dir, pool) = setup_pool();
    write_file(
        &dir,
        "config.toml",
        &format!(
            "[similarity]\nmin_similarity = 70\n\n[content]\npath = {:?}\n",
            pool.display().to_string()
        ),
    );

    let output = materia(dir.path())
        .args(["--format", "json", "similar", "source-formula"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["min_similarity"], 70);
    assert_eq!(json[0]["results"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_config_value() {
    let (dir, pool) = setup_pool();
    let config = write_file(&dir, "strict.toml", "[similarity]\nmax_results = 0\n");
    materia(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("--source")
        .arg(&pool)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("similarity.max_results"));
}

#[test]
fn test_oversized_cache_ttl_rejected() {
    let (dir, pool) = setup_pool();
    let config = write_file(
        &dir,
        "forever.toml",
        "[cache]\npool_ttl_secs = 9223372036854775807\n",
    );
    materia(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("--source")
        .arg(&pool)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cache.pool_ttl_secs"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    materia(dir.path())
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("config")
        .assert()
        .code(3);
}

#[test]
fn test_source_flag_overrides_env_url() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .env("MATERIA_CONTENT_URL", "http://127.0.0.1:9/formulas")
        .arg("--source")
        .arg(&pool)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("target-formula"));
}

#[test]
fn test_config_command_shows_effective_values() {
    let dir = tempdir().unwrap();
    let output = materia(dir.path())
        .env("MATERIA_CONTENT_TIMEOUT", "0")
        .args(["--url", "http://localhost:1337/api/formulas"])
        .args(["--format", "json", "config"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["similarity"]["max_results"], 5);
    assert_eq!(json["cache"]["pool_ttl_secs"], 300);
    assert_eq!(json["content"]["url"], "http://localhost:1337/api/formulas");
    assert_eq!(json["content"]["timeout_secs"], 1);
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_debug_logging_goes_to_stderr() {
    let (dir, pool) = setup_pool();
    materia(dir.path())
        .arg("--source")
        .arg(&pool)
        .args(["--log-level", "debug", "--format", "json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stderr(predicate::str::contains("fetched formula pool"));
}
