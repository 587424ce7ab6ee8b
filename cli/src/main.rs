//! `gallery-admin`: one-off storage setup for the photo gallery.
//!
//! With no subcommand it runs `configure`. Credentials come from flags, the
//! environment, or a `.env` file in the working directory.

mod setup;

use clap::{Args, Parser, Subcommand};
use platform::{PlatformClient, PlatformConfig, PlatformError, StorageApi};
use tracing_subscriber::EnvFilter;

const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "gallery-admin", about = "Configure gallery storage on the hosted platform")]
struct Cli {
    /// Project URL (falls back to NEXT_PUBLIC_SUPABASE_URL).
    #[arg(long, env = "SUPABASE_URL")]
    url: Option<String>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    service_role_key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Make the bucket public for images and set the CORS policy.
    Configure(ConfigureArgs),
    /// Print the bucket's current settings.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ConfigureArgs {
    #[arg(long, default_value = "images")]
    bucket: String,

    #[arg(long, default_value_t = setup::MAX_FILE_SIZE_BYTES)]
    max_file_size: u64,

    /// Additional allowed origin; repeatable.
    #[arg(long = "origin")]
    origins: Vec<String>,

    /// Leave the CORS policy untouched.
    #[arg(long, default_value_t = false)]
    skip_cors: bool,
}

impl Default for ConfigureArgs {
    fn default() -> Self {
        Self {
            bucket: setup::DEFAULT_BUCKET.to_owned(),
            max_file_size: setup::MAX_FILE_SIZE_BYTES,
            origins: Vec::new(),
            skip_cors: false,
        }
    }
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(long, default_value = "images")]
    bucket: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    let config = PlatformConfig::from_lookup(SERVICE_ROLE_KEY_VAR, |var| match var {
        "SUPABASE_URL" => cli.url.clone(),
        SERVICE_ROLE_KEY_VAR => cli.service_role_key.clone(),
        other => std::env::var(other).ok(),
    })
    .inspect_err(|e| tracing::error!(error = %e, "missing platform credentials"))?;
    let client = PlatformClient::new(config)?;

    match cli.command.unwrap_or_else(|| Command::Configure(ConfigureArgs::default())) {
        Command::Configure(args) => run_configure(&client, args).await,
        Command::Show(args) => run_show(&client, args).await,
    }
}

async fn run_configure(client: &PlatformClient, args: ConfigureArgs) -> Result<(), CliError> {
    let project_url = client.config().url.clone();
    let storage = client.storage(client.config().api_key.clone());
    let options = setup::bucket_options(args.max_file_size);
    let cors = (!args.skip_cors).then(|| setup::cors_config(&project_url, &args.origins));

    let bucket = setup::apply(&storage, &args.bucket, &options, cors.as_ref())
        .await
        .inspect_err(|e| tracing::error!(bucket = %args.bucket, error = %e, "storage configuration failed"))?;
    tracing::info!(bucket = %bucket.id, public = bucket.public, "storage configured");
    print_json(&serde_json::to_value(&bucket)?)
}

async fn run_show(client: &PlatformClient, args: ShowArgs) -> Result<(), CliError> {
    let storage = client.storage(client.config().api_key.clone());
    let bucket = storage.get_bucket(&args.bucket).await?;
    print_json(&serde_json::to_value(&bucket)?)
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
