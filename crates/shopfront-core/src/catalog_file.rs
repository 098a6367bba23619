//! Seed catalog file loading (`config/catalog.yaml`).
//!
//! The file carries the initial categories and products the database is
//! seeded from. Product categories are free-text labels, so no referential
//! check against the category list is performed here.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::product::Product;
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Load and validate the seed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    for product in &catalog.products {
        if product.title.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product {} has an empty title",
                product.id
            )));
        }
        if product.price.is_sign_negative() {
            return Err(ConfigError::Validation(format!(
                "product {} has a negative price",
                product.id
            )));
        }
        if !seen_ids.insert(product.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: {}",
                product.id
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen_names.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
    }

    Ok(())
}
