use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Formula pool used across the CLI tests.
///
/// `source-formula` vs `target-formula` scores 79.5 and `source-formula` vs
/// `equal-parts` scores 69.0.
pub const POOL_JSON: &str = r#"{
  "data": [
    {
      "id": "source-formula",
      "title": "Source Formula",
      "ingredients": [
        { "id": "ginger", "name": "Ginger", "quantity": 30, "unit": "g" },
        { "id": "licorice", "name": "Licorice", "quantity": "20" },
        { "herb": { "id": "cinnamon", "name": "Cinnamon" }, "amount": 50 }
      ]
    },
    {
      "id": "target-formula",
      "title": "Target Formula",
      "ingredients": [
        { "id": "ginger", "name": "Ginger", "quantity": 40 },
        { "id": "licorice", "name": "Licorice", "quantity": 60 }
      ]
    },
    {
      "id": "equal-parts",
      "name": "Equal Parts",
      "ingredients": ["ginger", "jujube", "peony", "licorice"]
    },
    { "id": "empty-formula", "title": "Empty Formula", "ingredients": [] },
    {
      "id": "unrelated",
      "title": "Unrelated \"Stone\" Formula",
      "ingredients": { "data": [{ "id": "gypsum", "name": "Gypsum", "quantity": 10 }] }
    }
  ]
}"#;

/// Get a Command for materia, isolated from the user's config and environment
pub fn materia(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("materia");
    cmd.env("MATERIA_CONFIG_DIR", config_dir)
        .env_remove("MATERIA_CONTENT_URL")
        .env_remove("MATERIA_CONTENT_TIMEOUT")
        .env_remove("MATERIA_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write the shared formula pool into `dir` and return its path
pub fn write_pool(dir: &TempDir) -> PathBuf {
    write_file(dir, "formulas.json", POOL_JSON)
}

/// Write an arbitrary file into `dir` and return its path
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Setup a temp dir holding the formula pool; returns the dir and pool path
pub fn setup_pool() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);
    (dir, pool)
}
