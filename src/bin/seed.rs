use std::str::FromStr;

use food_truck_api::{
    config::AppConfig,
    db::create_store,
    dto::{menu::CreateMenuItemRequest, options::CreateOptionRequest},
    error::AppError,
    services::{menu_service, option_service},
    state::AppState,
};
use rust_decimal::Decimal;

const OPTIONS: &[(&str, &str)] = &[
    ("Extra Cheese", "1.50"),
    ("Bacon", "2.00"),
    ("Jalapenos", "0.75"),
    ("Guacamole", "1.25"),
];

const MENU: &[(&str, &str, &str, &[&str])] = &[
    (
        "Classic Burger",
        "Beef patty, lettuce, tomato, house sauce",
        "12.99",
        &["Extra Cheese", "Bacon", "Jalapenos"],
    ),
    (
        "Veggie Wrap",
        "Grilled vegetables in a flour tortilla",
        "9.50",
        &["Guacamole", "Jalapenos"],
    ),
    ("Loaded Fries", "Fries with cheese sauce", "6.25", &["Bacon"]),
    ("Lemonade", "Fresh squeezed", "3.00", &[]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    if config.database_url.is_none() {
        anyhow::bail!("DATABASE_URL must be set, an in-memory seed would be lost on exit");
    }

    let store = create_store(&config).await?;
    let state = AppState::new(store, config.ordering);

    let mut created = 0;
    for (name, price) in OPTIONS {
        let request = CreateOptionRequest {
            name: name.to_string(),
            price: Decimal::from_str(price)?,
        };
        created += skip_existing(option_service::create_option(&state, request).await)?;
    }

    for (name, description, price, options) in MENU {
        let request = CreateMenuItemRequest {
            name: name.to_string(),
            description: Some(description.to_string()),
            price: Decimal::from_str(price)?,
            available: true,
            options: options.iter().map(|o| o.to_string()).collect(),
        };
        created += skip_existing(menu_service::create_menu_item(&state, request).await)?;
    }

    println!("Seed completed. {created} record(s) created");
    Ok(())
}

/// Counts a created record, treating a name clash as already seeded.
fn skip_existing<T>(result: Result<T, AppError>) -> anyhow::Result<usize> {
    match result {
        Ok(_) => Ok(1),
        Err(AppError::Conflict(_)) => Ok(0),
        Err(err) => Err(err.into()),
    }
}
