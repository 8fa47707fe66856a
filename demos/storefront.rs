//! Storefront Demo
//!
//! Walks the whole ordering journey on the console: load the menu, fill a
//! cart, apply a coupon, render the review table and print the WhatsApp
//! deep link a real checkout would open.
//!
//! Use `-c` to pick a menu category and `-n` how many of its entries to add
//! Use `--coupon` to apply a coupon code
//! Use `--pickup` to collect at the counter instead of delivering

use std::{env::temp_dir, io};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vila::{
    catalog::{Catalog, Category},
    checkout::{DeliveryMethod, PaymentMethod},
    flow::CheckoutFlow,
    storage::{DEFAULT_STORE_FILE, JsonFileStorage},
    store::CartStore,
    utils::StorefrontArgs,
};

/// Storefront Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = StorefrontArgs::parse();

    let catalog = Catalog::builtin()?;
    let category = Category::from_key(&args.category)
        .ok_or_else(|| anyhow::anyhow!("unknown category: {}", args.category))?;

    let cart_path = args
        .cart_file
        .map_or_else(|| temp_dir().join(DEFAULT_STORE_FILE), Into::into);

    let mut store = CartStore::open(JsonFileStorage::new(cart_path));
    let mut flow = CheckoutFlow::new();

    for (key, entry) in catalog.entries(category).take(args.n) {
        if let Some(selection) = catalog.selection(key) {
            store.add_to_cart(selection)?;
            println!("+ {} ({})", entry.name, entry.display_price);
        }
    }

    // Stuff the rim of the first pizza line, as a customer would.
    if matches!(category, Category::Salgadas | Category::Doces)
        && let Some(first) = store.items().first().map(|item| item.name().to_string())
    {
        store.update_item_rim(&first, None, "Catupiry");
    }

    if let Some(code) = args.coupon.as_deref() {
        flow.set_coupon_input(code);

        if flow.apply_coupon(&mut store) {
            println!("coupon {code} applied");
        } else {
            println!("coupon {code} rejected");
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    flow.render_review(&mut handle, &store)?;

    flow.next_step();

    if args.pickup {
        flow.select_delivery(DeliveryMethod::Pickup);
    } else {
        flow.set_address(args.address.as_str());
    }

    flow.select_payment(PaymentMethod::Pix);

    match flow.submit(&store) {
        Some(request) => {
            println!("\n{}\n", request.message);
            println!("order link: {}", request.url);
        }
        None => println!("checkout blocked: a delivery address is required"),
    }

    Ok(())
}
