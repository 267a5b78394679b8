//! The configuration shipped at the repository root stays loadable.

use std::path::Path;

use seo_forge::config::BlogConfig;
use seo_forge::site::og_locale;

fn shipped_config() -> BlogConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.json");
    BlogConfig::load(&path).expect("shipped config.json should load")
}

#[test]
fn test_shipped_catalog() {
    let config = shipped_config();
    assert_eq!(config.products.len(), 15);
    assert_eq!(config.languages.len(), 24);
    assert_eq!(config.angles.len(), 10);
    assert_eq!(config.generation.products_per_day, 4);
}

#[test]
fn test_every_language_has_a_locale() {
    let config = shipped_config();
    for language in &config.languages {
        let locale = og_locale(&language.code);
        assert!(
            language.code == "en" || locale != "en_US",
            "{} falls back to en_US",
            language.code
        );
    }
}

#[test]
fn test_paths_resolve_next_to_config() {
    let config = shipped_config();
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    assert_eq!(config.paths.output_dir, root.join("public"));
    assert_eq!(config.llm.api_key_file, root.join("deepseek_api_key.txt"));
}
