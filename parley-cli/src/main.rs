use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use parley_core::{Config, Credential, InferenceGateway};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Talk to the configured inference endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt and print the model's reply
    Ask {
        /// The user prompt
        prompt: String,

        /// Override the system prompt for this call
        #[arg(short, long)]
        system: Option<String>,

        /// Print the full JSON reply instead of just the text
        #[arg(long)]
        raw: bool,
    },

    /// Show the resolved configuration (credential redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    // Load .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            prompt,
            system,
            raw,
        } => {
            ask_command(prompt, system, raw).await?;
        }
        Commands::Config => {
            config_command()?;
        }
    }

    Ok(())
}

async fn ask_command(prompt: String, system: Option<String>, raw: bool) -> Result<()> {
    let config = Config::from_env()?;
    let credential = Credential::from_env()?;
    let gateway = InferenceGateway::new(config, credential);

    // Ctrl-C aborts the in-flight call instead of killing the process mid-write.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("cancelling in-flight request");
                cancel.cancel();
            }
        });
    }

    let response = match system {
        Some(system_prompt) => {
            gateway
                .complete_with(&system_prompt, &[], &prompt, &cancel)
                .await?
        }
        None => gateway.complete(&[], &prompt, &cancel).await?,
    };

    if raw {
        println!("{}", serde_json::to_string_pretty(&response.raw)?);
    } else {
        println!("{}", response.content);
    }

    Ok(())
}

fn config_command() -> Result<()> {
    let config = Config::from_env()?;
    let credential = Credential::from_env();

    let or_unset = |value: &str| {
        if value.is_empty() {
            "<not set>".to_string()
        } else {
            value.to_string()
        }
    };

    println!("endpoint:  {}", or_unset(&config.endpoint));
    println!("model:     {}", or_unset(&config.model_name));
    println!("client id: {}", config.client_id.as_deref().unwrap_or("<not set>"));
    println!("tenant id: {}", config.tenant_id.as_deref().unwrap_or("<not set>"));
    println!(
        "api key:   {}",
        if credential.is_ok() {
            "<set, redacted>"
        } else {
            "<not set>"
        }
    );

    Ok(())
}
