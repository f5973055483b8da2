use std::{env, time::Duration};

pub const DEFAULT_CART_KEY: &str = "default";
pub const CART_DELETE_BACKOFF_MAX: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string. When unset the service keeps its data in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub ordering: OrderingConfig,
}

/// Knobs of the cart/order core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingConfig {
    /// Cart owner used when a request carries no cart key.
    pub default_cart_key: String,
    /// Attempts at allocating a free order number before giving up.
    pub order_number_max_attempts: u32,
    /// First pause between attempts at removing a checked-out cart; doubles
    /// per attempt up to [`CART_DELETE_BACKOFF_MAX`].
    pub cart_delete_backoff: Duration,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            default_cart_key: DEFAULT_CART_KEY.to_string(),
            order_number_max_attempts: 5,
            cart_delete_backoff: Duration::from_millis(50),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = OrderingConfig::default();
        let default_cart_key = env::var("DEFAULT_CART_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .unwrap_or(defaults.default_cart_key);
        let order_number_max_attempts = match env::var("ORDER_NUMBER_MAX_ATTEMPTS") {
            Ok(raw) => {
                let attempts = raw.parse::<u32>()?;
                anyhow::ensure!(attempts > 0, "ORDER_NUMBER_MAX_ATTEMPTS must be at least 1");
                attempts
            }
            Err(_) => defaults.order_number_max_attempts,
        };

        Ok(Self {
            database_url,
            host,
            port,
            ordering: OrderingConfig {
                default_cart_key,
                order_number_max_attempts,
                cart_delete_backoff: defaults.cart_delete_backoff,
            },
        })
    }
}
