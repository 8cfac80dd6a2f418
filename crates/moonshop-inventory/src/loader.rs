//! Inventory file loading.
//!
//! The inventory is a JSON object of `productKey → Product`, in the order
//! the storefront lists products. Key order is kept.

use std::path::Path;

use moonshop_core::validation::{validate_payload_segment, validate_price};
use moonshop_core::Catalog;
use tracing::{debug, info};

use crate::error::{InventoryError, InventoryResult};

/// Reads and parses the inventory file.
///
/// ## Errors
/// - `CatalogUnavailable` when the file cannot be read
/// - `InvalidCatalog` when it is not a catalog, or a product is unusable
pub async fn load_catalog(path: impl AsRef<Path>) -> InventoryResult<Catalog> {
    let path = path.as_ref();
    debug!(?path, "Reading inventory");

    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| InventoryError::CatalogUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

    let catalog = parse_catalog(&contents)?;
    info!(?path, products = catalog.len(), "Inventory loaded");
    Ok(catalog)
}

/// Parses inventory JSON and checks every product.
pub fn parse_catalog(json: &str) -> InventoryResult<Catalog> {
    let catalog: Catalog = serde_json::from_str(json)?;
    check_catalog(&catalog)?;
    Ok(catalog)
}

/// Rejects what the storefront could not sell or encode.
///
/// ## Rules
/// - Names are non-empty and unique
/// - Names, color names and sizes carry no token separator (`,` `|`)
/// - Prices are not negative
fn check_catalog(catalog: &Catalog) -> InventoryResult<()> {
    for (key, product) in catalog.iter() {
        let segments = std::iter::once(("name", product.name.as_str()))
            .chain(product.colors.iter().map(|c| ("color", c.name.as_str())))
            .chain(product.sizes.iter().map(|s| ("size", s.as_str())));
        for (field, value) in segments {
            validate_payload_segment(field, value).map_err(|e| {
                InventoryError::InvalidCatalog(format!("product '{key}': {e}"))
            })?;
        }

        if catalog.key_for_name(&product.name) != Some(key) {
            return Err(InventoryError::InvalidCatalog(format!(
                "product '{key}' repeats the name '{}'",
                product.name
            )));
        }

        validate_price(product.price).map_err(|e| {
            InventoryError::InvalidCatalog(format!("product '{key}': {e}"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r##"{
        "remera-basica": {
            "id": "S001", "name": "Remera", "price": 12000, "type": "remeras",
            "colors": [{"name": "Negro", "hex": "#000"}, {"name": "Blanco", "hex": "#fff"}],
            "sizes": ["M", "L"], "tags": ["algodon"], "images": ["remera.jpg"]
        },
        "gorra": {"name": "Gorra", "price": 8500, "type": "accesorios"}
    }"##;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(INVENTORY).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("gorra").map(|p| p.price), Some(8500));
        assert_eq!(catalog.iter().next().map(|(k, _)| k), Some("remera-basica"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let json = r#"{"a": {"name": "Remera", "price": 1}, "b": {"name": "Remera", "price": 2}}"#;
        assert!(matches!(parse_catalog(json), Err(InventoryError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_negative_price_and_empty_name() {
        assert!(parse_catalog(r#"{"a": {"name": "Remera", "price": -1}}"#).is_err());
        assert!(parse_catalog(r#"{"a": {"name": "", "price": 1}}"#).is_err());
        assert!(parse_catalog(r#"{"a": {"name": "A", "price": 1, "sizes": ["S,M"]}}"#).is_err());
        assert!(parse_catalog("[]").unwrap_err().is_catalog_error());
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let dir = std::env::temp_dir().join(format!("moonshop-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("inventory.json");
        std::fs::write(&path, INVENTORY).unwrap();

        let catalog = load_catalog(&path).await.unwrap();
        assert_eq!(catalog.len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let err = load_catalog("/definitely/not/here/inventory.json").await.unwrap_err();
        assert!(matches!(err, InventoryError::CatalogUnavailable { .. }));
    }
}
