//! Command-line cart for trying the library against a storage directory

use libfoodhub::{
    api::checkout::CheckoutApi,
    core::{
        checkout::CheckoutRequest, notify::LogSink, queue::QueuedFileBackend, types::PaymentMethod,
    },
    Cart, CartConfig, CartStorage, NewCartItem,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FoodHub cart CLI
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the cart snapshot (defaults to FOODHUB_STORAGE_DIR or .foodhub)
    #[clap(short, long)]
    storage_dir: Option<PathBuf>,

    /// Subcommands
    #[clap(subcommand)]
    command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Add an item, or more of an item already in the cart
    Add {
        /// Menu item ID
        #[clap(short, long)]
        id: String,
        /// Item name
        #[clap(short, long)]
        name: String,
        /// Unit price
        #[clap(short, long)]
        price: f64,
        /// Units to add
        #[clap(short, long)]
        quantity: Option<u32>,
        /// Restaurant ID
        #[clap(short, long)]
        restaurant: Option<String>,
        /// Instructions for the kitchen
        #[clap(long)]
        instructions: Option<String>,
    },
    /// Remove an item
    Remove {
        /// Menu item ID
        #[clap(short, long)]
        id: String,
    },
    /// Set the quantity of an item (0 removes it)
    Set {
        /// Menu item ID
        #[clap(short, long)]
        id: String,
        /// New quantity
        #[clap(short, long, allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show the cart and its totals
    Show,
    /// Place an order for the cart contents
    Checkout {
        /// Delivery address
        #[clap(short, long)]
        address: String,
        /// Payment method (cod, card, upi, wallet)
        #[clap(short, long, default_value = "cod")]
        payment: String,
    },
}

/// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let mut config = CartConfig::from_env();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    let backend = QueuedFileBackend::spawn(&config.storage_dir);
    let mut cart = Cart::new(CartStorage::new(backend.clone(), config.storage_key.clone()))
        .with_sink(LogSink);

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            quantity,
            restaurant,
            instructions,
        } => {
            let mut item = NewCartItem::new(id, name, price);
            item.quantity = quantity;
            item.restaurant_id = restaurant;
            item.special_instructions = instructions;

            if cart.add_to_cart(item).is_none() {
                return Err(anyhow!("Item rejected: id, name and a positive price are required"));
            }
        }
        Commands::Remove { id } => {
            if cart.remove_from_cart(&id).is_none() {
                println!("{id} is not in the cart");
            }
        }
        Commands::Set { id, quantity } => {
            if cart.update_quantity(&id, quantity).is_none() {
                println!("{id} is not in the cart");
            }
        }
        Commands::Clear => {
            cart.clear_cart();
        }
        Commands::Show => {}
        Commands::Checkout { address, payment } => {
            let payment_method = PaymentMethod::from_str(&payment)
                .ok_or_else(|| anyhow!("Unknown payment method: {payment}"))?;
            let request = CheckoutRequest::new(address).with_payment_method(payment_method);

            let order = CheckoutApi::from_config(&config)
                .place_order(&mut cart, &request, |draft| Ok(draft.confirm()))
                .context("Checkout failed")?;

            println!("{}", serde_json::to_string_pretty(&order)?);
            println!("Status: {}", order.status.label());
        }
    }

    print_cart(&cart, &config);

    let saved = backend.shutdown().await;
    if let Err(e) = &saved {
        log::error!("Cart write failed: {}", e);
    }
    if saved.is_err() || !cart.is_persisted() {
        eprintln!("warning: cart could not be saved, changes will be lost");
    }

    Ok(())
}

fn print_cart(cart: &Cart, config: &CartConfig) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{:>3} x {:<24} {:>10.2}  ({})",
            item.quantity, item.name, item.item_total, item.menu_item_id
        );
    }

    let summary = CheckoutApi::from_config(config).summary(cart);
    println!("{:>30} {:>10.2}", "Subtotal", summary.subtotal);
    println!("{:>30} {:>10.2}", "Delivery fee", summary.delivery_fee);
    println!("{:>30} {:>10.2}", "Total", summary.total);
    println!("{} items", summary.item_count);
}
