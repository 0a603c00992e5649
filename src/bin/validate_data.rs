//! Validate the dataset registry: every listed file exists and parses as JSON.
//! Run: cargo run --bin validate_data

use std::path::PathBuf;

use ivcalc::config::DATA_DIR_ENV;
use ivcalc::data::registry::{check_registry, load_registry, DEFAULT_REGISTRY_FILE};

fn data_root() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir).join("data")
}

fn main() {
    let data_root = data_root();
    let Some(registry) = load_registry(&data_root) else {
        eprintln!(
            "Registry not found or unreadable: {}",
            data_root.join(DEFAULT_REGISTRY_FILE).display()
        );
        std::process::exit(1);
    };

    let problems = check_registry(&data_root, &registry);
    for problem in &problems {
        eprintln!("{problem}");
    }
    println!(
        "Validated {} datasets, {} ok, {} errors",
        registry.len(),
        registry.len() - problems.len(),
        problems.len()
    );
    if !problems.is_empty() {
        std::process::exit(1);
    }
}
