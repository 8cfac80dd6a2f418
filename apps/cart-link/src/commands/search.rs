//! Catalog lookup from the command line.

use moonshop_core::{Catalog, Money};
use moonshop_inventory::{search, ProductFilter};
use serde::Serialize;

use super::SearchArgs;
use crate::context::AppContext;
use crate::error::CliResult;

/// One row of search output.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub key: String,
    pub id: Option<String>,
    pub name: String,
    pub price: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &AppContext) -> CliResult<()> {
    let catalog = ctx.store.catalog().await;
    let hits = find(&catalog, &args.term, &args.types);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No products match '{}'", args.term);
        return Ok(());
    }
    for hit in &hits {
        println!(
            "{:<24} {:<8} {:<32} {:>12}",
            hit.key,
            hit.id.as_deref().unwrap_or("-"),
            hit.name,
            Money::from_units(hit.price).to_string()
        );
    }
    Ok(())
}

fn find(catalog: &Catalog, term: &str, types: &[String]) -> Vec<SearchHit> {
    let filter = ProductFilter {
        types: types.to_vec(),
        ..ProductFilter::default()
    };
    filter
        .apply(search(catalog, term))
        .into_iter()
        .map(|(key, product)| SearchHit {
            key: key.to_string(),
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            kind: product.kind.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonshop_inventory::parse_catalog;

    #[test]
    fn test_find_with_type_filter() {
        let catalog = parse_catalog(
            r#"{
            "remera": {"id": "S001", "name": "Remera Negra", "price": 12000, "type": "remeras"},
            "buzo": {"id": "B001", "name": "Buzo Negro", "price": 30000, "type": "buzos"}
        }"#,
        )
        .unwrap();

        let hits = find(&catalog, "negr", &[]);
        assert_eq!(hits.len(), 2);

        let hits = find(&catalog, "negr", &["buzos".to_string()]);
        assert_eq!(
            hits,
            vec![SearchHit {
                key: "buzo".into(),
                id: Some("B001".into()),
                name: "Buzo Negro".into(),
                price: 30000,
                kind: Some("buzos".into()),
            }]
        );
    }
}
