//! # Demo Driver
//!
//! Drives the storefront end-to-end for development: seeds a few carts,
//! walks checkouts past the discount cadence, redeems the auto-generated
//! code, and dumps the resulting statistics.
//!
//! ## Usage
//! ```bash
//! cargo run -p vendo-store --bin demo
//!
//! # With overridden parameters
//! VENDO_DISCOUNT_FREQUENCY=2 VENDO_DISCOUNT_PERCENT=15 cargo run -p vendo-store --bin demo
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use vendo_store::{StoreConfig, Storefront};

/// A small fixed catalog for the demo carts: (item_id, name, price in cents).
const CATALOG: &[(&str, &str, i64)] = &[
    ("KB-201", "Mechanical Keyboard", 8999),
    ("MS-114", "Wireless Mouse", 2499),
    ("HUB-07", "USB-C Hub", 3999),
    ("MON-27", "27in Monitor", 21999),
    ("CAM-02", "Webcam", 5499),
    ("HS-330", "Headset", 7999),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = StoreConfig::from_env();
    info!(
        frequency = config.discount_order_frequency,
        percent = %config.discount_percent,
        expiry_days = config.code_expiry_days,
        "Starting storefront demo"
    );

    let store = Storefront::new(config)?;
    let frequency = store.config().discount_order_frequency;

    // Walk enough checkouts to hit the cadence once.
    for n in 0..frequency {
        let user = format!("user{}", n + 1);
        let (item_id, name, price) = CATALOG[n as usize % CATALOG.len()];

        store.add_item(&user, item_id, name, price, 1)?;
        store.add_item(&user, item_id, name, price, 1)?; // consolidates
        let (extra_id, extra_name, extra_price) = CATALOG[(n as usize + 1) % CATALOG.len()];
        store.add_item(&user, extra_id, extra_name, extra_price, 1)?;

        let order = store.checkout(&user, None)?;
        info!(order_id = %order.id, user = %user, total = %order.total(), "Checkout complete");
    }

    // The cadence fired: exactly one code is now discoverable via listing.
    let codes = store.list_discount_codes();
    let minted = codes
        .first()
        .ok_or("cadence did not mint a discount code")?;
    info!(code = %minted.code, "Found auto-generated code, spending it");

    let (item_id, name, price) = CATALOG[0];
    store.add_item("bargain-hunter", item_id, name, price, 3)?;
    let discounted = store.checkout("bargain-hunter", Some(&minted.code))?;
    info!(
        order_id = %discounted.id,
        subtotal = %discounted.subtotal(),
        discount = %discounted.discount(),
        total = %discounted.total(),
        "Discounted checkout complete"
    );

    // Spent codes stay listed; a second redemption attempt must fail.
    store.add_item("copycat", item_id, name, price, 1)?;
    match store.checkout("copycat", Some(&minted.code)) {
        Err(err) => info!(%err, "Second redemption rejected as expected"),
        Ok(_) => return Err("spent code was redeemed twice".into()),
    }

    println!("{}", serde_json::to_string_pretty(&store.stats())?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
