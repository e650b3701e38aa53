use std::time::Duration;

use anyhow::Context;

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "demo_todo";
const DEFAULT_COLLECTION: &str = "todo";
const DEFAULT_PORT: u16 = 9000;

pub const READ_TIMEOUT: Duration = Duration::from_secs(60);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(60);
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
    pub port: u16,
}

impl Config {
    /// Reads `.env` and the process environment, falling back to the built-in
    /// defaults for anything unset.
    pub fn new() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let port = match dotenvy::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {port:?}"))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            mongodb_uri: var_or("MONGODB_URI", DEFAULT_MONGODB_URI),
            database: var_or("MONGODB_DATABASE", DEFAULT_DATABASE),
            collection: var_or("MONGODB_COLLECTION", DEFAULT_COLLECTION),
            port,
        })
    }

    pub fn new_mongodb_uri(mongodb_uri: String) -> Self {
        Self {
            mongodb_uri,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenvy::var(key).unwrap_or_else(|_| default.to_string())
}
