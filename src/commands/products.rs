//! Affiliate product bookkeeping: cache product listings for later use.

use crate::commands::menu::parse_selection;
use crate::context::AppContext;
use crate::error::ReelgenResult;
use crate::status;
use crate::store::{Product, Store};
use colored::*;
use serde_json::Value;

const PRODUCT_OPTIONS: &[&str] = &["Add a product", "List products", "Back"];

pub fn menu(ctx: &AppContext) -> ReelgenResult<()> {
    let store = Store::new(ctx.workspace.cache_dir());

    loop {
        status::info("\n============ PRODUCTS ============");
        for (idx, option) in PRODUCT_OPTIONS.iter().enumerate() {
            println!("{}", format!(" {}. {option}", idx + 1).cyan());
        }
        status::info("=================================\n");

        let choice = loop {
            let input = status::question("Select an option: ")?;
            match parse_selection(&input, PRODUCT_OPTIONS.len()) {
                Some(n) => break n,
                None => status::warning("Invalid input: enter a listed number."),
            }
        };

        match choice {
            1 => add_product(&store)?,
            2 => list_products(&store)?,
            _ => return Ok(()),
        }
    }
}

fn add_product(store: &Store) -> ReelgenResult<()> {
    let name = status::question("Product name: ")?;
    let url = status::question("Affiliate URL: ")?;

    let mut product = Product::new();
    product.insert("name".into(), Value::String(name));
    product.insert("url".into(), Value::String(url));
    store.add_product(product)?;

    status::success("Product cached.");
    Ok(())
}

fn list_products(store: &Store) -> ReelgenResult<()> {
    let products = store.products()?;
    if products.is_empty() {
        status::warning("No products cached yet.");
        return Ok(());
    }

    for (idx, product) in products.iter().enumerate() {
        let name = product.get("name").and_then(Value::as_str).unwrap_or("?");
        let url = product.get("url").and_then(Value::as_str).unwrap_or("");
        println!(
            " {} {} {}",
            format!("{}.", idx + 1).cyan(),
            name.green(),
            url.bright_black()
        );
    }
    Ok(())
}
