use anyhow::Context;
use std::{env, net::SocketAddr, path::PathBuf};

pub const DEFAULT_EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub expo_push_url: String,
    pub expo_access_token: Option<String>,
    pub upload_dir: PathBuf,
    pub session_secure: bool,
    /// Email and password of the admin created on first start.
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env file is fine; the real environment still applies.
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "debug".into());
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".into())
            .parse()
            .context("BIND_ADDR is not a socket address")?;
        let expo_push_url =
            env::var("EXPO_PUSH_URL").unwrap_or_else(|_| DEFAULT_EXPO_PUSH_URL.into());
        let expo_access_token = env::var("EXPO_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".into())
            .into();
        let session_secure = env::var("SESSION_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            expo_push_url,
            expo_access_token,
            upload_dir,
            session_secure,
            bootstrap_admin,
        })
    }

    /// Settings for tests and local tooling: no push credentials, uploads
    /// under the system temp dir.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            rust_log: "debug".into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            expo_push_url: DEFAULT_EXPO_PUSH_URL.into(),
            expo_access_token: None,
            upload_dir: env::temp_dir().join("ministry-uploads"),
            session_secure: false,
            bootstrap_admin: None,
        }
    }
}
