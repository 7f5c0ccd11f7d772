use clap::{Parser, Subcommand};
use serde_json::Value;

use feature_flag::client::{FlagClient, BASE_URL_VAR, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "flag-cli")]
#[command(about = "Management CLI for the feature flag service", long_about = None)]
struct Cli {
    #[arg(short, long, env = BASE_URL_VAR, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Request timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health and current mode
    Health,
    /// List every flag
    Flags,
    /// Show a single flag
    Get { name: String },
    /// Create or update a flag. VALUE is parsed as JSON, else taken as a string
    Set { name: String, value: String },
    /// Show the environment mode (falls back to "test" if the service is unreachable)
    Mode,
    /// Switch the environment mode (test | production)
    SetMode { mode: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = FlagClient::with_timeout(
        &cli.url,
        std::time::Duration::from_millis(cli.timeout_ms),
    )?;

    let output = match cli.command {
        Commands::Health => client.health().await?,
        Commands::Flags => Value::Object(client.list_flags().await?),
        Commands::Get { name } => client.get_flag(&name).await?,
        Commands::Set { name, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            client.set_flag(&name, value).await?
        }
        Commands::Mode => Value::from(client.current_mode().await),
        Commands::SetMode { mode } => Value::from(client.set_mode(&mode).await?),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
