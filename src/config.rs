use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

const DEV_JWT_SECRET: &str = "change-me-in-production";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    pub admin_ui_dir: String,
    pub jwt_secret: String,
    pub secure_cookies: bool,
    pub migration_secret: String,
    pub seed_admin: SeedAdmin,
    pub notifier: NotifierConfig,
}

/// Credentials of the administrator created on first start.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Chat-messaging webhook settings. Notifications are disabled unless
/// instance id, token and recipient are all present.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    pub base_url: String,
    pub instance_id: Option<String>,
    pub token: Option<String>,
    pub to: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Artist gallery back-end API")]
pub struct Args {
    /// Host to bind to (overrides GALLERY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides GALLERY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides GALLERY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory where uploaded files are stored (overrides GALLERY_UPLOAD_DIR)
    #[arg(long)]
    pub upload_dir: Option<String>,

    /// Directory holding the admin UI pages (overrides GALLERY_ADMIN_UI_DIR)
    #[arg(long)]
    pub admin_ui_dir: Option<String>,

    /// Run migrations, seed the admin account and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();

        let jwt_secret = env::var("GALLERY_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("GALLERY_JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.into()
        });

        let cfg = Self {
            host: args
                .host
                .unwrap_or_else(|| env_or("GALLERY_HOST", "0.0.0.0")),
            port: match args.port {
                Some(port) => port,
                None => parse_env("GALLERY_PORT", 3000)?,
            },
            database_url: args
                .database_url
                .unwrap_or_else(|| env_or("GALLERY_DATABASE_URL", "sqlite://./data/gallery.db")),
            upload_dir: args
                .upload_dir
                .unwrap_or_else(|| env_or("GALLERY_UPLOAD_DIR", "./data/uploads")),
            admin_ui_dir: args
                .admin_ui_dir
                .unwrap_or_else(|| env_or("GALLERY_ADMIN_UI_DIR", "./admin-ui")),
            jwt_secret,
            secure_cookies: parse_env("GALLERY_SECURE_COOKIES", false)?,
            migration_secret: env_or("GALLERY_MIGRATION_SECRET", "migrate-categories-2024"),
            seed_admin: SeedAdmin {
                username: env_or("GALLERY_ADMIN_USERNAME", "admin"),
                email: env_or("GALLERY_ADMIN_EMAIL", "admin@admin.com"),
                password: env_or("GALLERY_ADMIN_PASSWORD", "Admin@123"),
            },
            notifier: NotifierConfig {
                base_url: env_or("ULTRAMSG_BASE_URL", "https://api.ultramsg.com"),
                instance_id: env::var("ULTRAMSG_INSTANCE_ID").ok(),
                token: env::var("ULTRAMSG_TOKEN").ok(),
                to: env::var("ULTRAMSG_TO").ok(),
            },
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
