mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use hayah_core::config::AppConfig;
use hayah_core::ProfileUpdate;

use crate::cli::{Cli, Commands, ProfileAction};
use crate::commands::AppContext;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

/// Environment variables win over the config file
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(v) = std::env::var("HAYAH_API_URL") {
        if !v.trim().is_empty() {
            config.api.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("HAYAH_DATA_DIR") {
        if !v.trim().is_empty() {
            config.general.data_dir = v;
        }
    }
    if let Ok(v) = std::env::var("HAYAH_FLOW") {
        if !v.trim().is_empty() {
            config.wizard.flow = v;
        }
    }
    if let Ok(v) = std::env::var("HAYAH_TIMEOUT_SECONDS") {
        config.api.request_timeout_seconds = v.parse::<u64>().ok().filter(|&n| n > 0);
    }
}

async fn async_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: AppConfig = toml::from_str(&config_str)?;
    apply_env_overrides(&mut config);

    info!(api = %config.api.base_url, data_dir = %config.general.data_dir, "hayah starting");
    let ctx = AppContext::open(config).await?;

    match cli.command {
        Commands::Register { answers, flow } => {
            commands::register::run(&ctx, &answers, flow).await?;
        }
        Commands::CheckEmail { email } => {
            commands::account::check_email(&ctx, &email).await?;
        }
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, &password).await?;
        }
        Commands::Logout => {
            commands::account::logout(&ctx).await?;
        }
        Commands::Recover { email } => {
            commands::account::recover(&ctx, &email).await?;
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show { refresh } => {
                commands::profile::show(&ctx, refresh).await?;
            }
            ProfileAction::Update {
                name,
                phone,
                birth_date,
                state,
                city,
                bio,
            } => {
                let update = ProfileUpdate {
                    name,
                    phone,
                    birth_date,
                    state,
                    city,
                    bio,
                };
                commands::profile::update(&ctx, update).await?;
            }
            ProfileAction::UploadImage { path } => {
                commands::profile::upload_image(&ctx, &path).await?;
            }
            ProfileAction::DeleteImage => {
                commands::profile::delete_image(&ctx).await?;
            }
        },
        Commands::Dashboard { refresh } => {
            commands::dashboard::run(&ctx, refresh).await?;
        }
        Commands::Cities { state } => {
            commands::locations::cities(&ctx, &state).await?;
        }
    }

    Ok(())
}
