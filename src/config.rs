use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    /// Static storage credentials. When absent the SDK's default provider
    /// chain is used instead.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,

    /// Region every created bucket is constrained to.
    pub region: String,

    /// Custom endpoint for S3-compatible services (MinIO, R2).
    pub endpoint_url: Option<String>,

    /// Path-style addressing, required by most non-AWS endpoints.
    pub force_path_style: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Web console for S3-compatible object storage")]
pub struct Args {
    /// Host to bind to (overrides S3_CONSOLE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides S3_CONSOLE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage region for created buckets (overrides DEFAULT_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Custom storage endpoint URL (overrides S3_CONSOLE_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    ///
    /// Credentials come only from the environment; they are never accepted
    /// on the command line.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("S3_CONSOLE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("S3_CONSOLE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing S3_CONSOLE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading S3_CONSOLE_PORT"),
        };
        let env_region = env::var("DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".into());
        let env_endpoint = env::var("S3_CONSOLE_ENDPOINT_URL").ok();

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            access_key_id: env::var("ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("SECRET_ACCESS_KEY").ok(),
            region: args.region.unwrap_or(env_region),
            endpoint_url: args.endpoint_url.or(env_endpoint),
            force_path_style: args.path_style,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Manual Debug so the secret key never reaches the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}
