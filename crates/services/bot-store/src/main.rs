//! Bot Store - administrative CLI over the bot's user and preset storage.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use bot_store_lib::config::BotStoreConfig;
use bot_store_lib::{BotStore, MigrateAction};
use common::AppError;
use domain::{Interval, NewPreset};

#[derive(Parser)]
#[command(name = "bot-store")]
#[command(about = "User and preset storage for the price-alert bot")]
struct Cli {
    /// Database URL (overrides BOT_STORE_DATABASE_URL / DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Inspect and manage users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Inspect and manage presets
    Presets {
        #[command(subcommand)]
        action: PresetCommands,
    },
    /// Print the full start-up state (users with their presets)
    State,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Print every user's initial state
    List,
    /// Print one user's state, registering the user if unknown
    Show { user_id: i64 },
    /// Register a user
    Create { user_id: i64 },
    /// Start or stop a user's watch loop
    SetRunning {
        user_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        running: bool,
    },
}

#[derive(Subcommand)]
enum PresetCommands {
    /// List a user's presets
    List {
        user_id: i64,
        /// Only active presets
        #[arg(long)]
        active: bool,
    },
    /// Add a preset for a user
    Add {
        user_id: i64,
        #[arg(long)]
        name: String,
        /// Comma-separated pairs, e.g. BTCUSDT,ETHUSDT
        #[arg(long, value_delimiter = ',')]
        pairs: Vec<String>,
        /// One of 1s, 1m, 5m, 15m, 1h, 4h, 1d
        #[arg(long)]
        interval: String,
        /// Change threshold in percent
        #[arg(long)]
        percent: f64,
        /// Activate right away
        #[arg(long)]
        active: bool,
    },
    /// Activate or deactivate a preset
    Toggle {
        preset_id: Uuid,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Delete a preset
    Delete { preset_id: Uuid },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = BotStoreConfig::from_env().with_database_url(cli.database_url);

    if let Commands::Migrate { action } = cli.command {
        let migrate_action = match action {
            MigrateCommands::Up => MigrateAction::Up,
            MigrateCommands::Down => MigrateAction::Down,
            MigrateCommands::Status => MigrateAction::Status,
            MigrateCommands::Fresh => MigrateAction::Fresh,
        };
        return bot_store_lib::run_migrations(&config, migrate_action).await;
    }

    let store = bot_store_lib::connect(&config).await?;
    if let Err(e) = run(&store, cli.command).await {
        tracing::error!(code = e.code(), "{}", e);
        return Err(e.into());
    }

    Ok(())
}

async fn run(store: &BotStore, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Migrate { .. } => {}
        Commands::Users { action } => match action {
            UserCommands::List => print_json(&store.users.get_all_users_data().await?)?,
            UserCommands::Show { user_id } => {
                print_json(&store.users.get_user_state(user_id).await?)?
            }
            UserCommands::Create { user_id } => {
                if store.users.create_user_if_not_exists(user_id).await? {
                    println!("Created user {}", user_id);
                } else {
                    println!("User {} already exists", user_id);
                }
            }
            UserCommands::SetRunning { user_id, running } => {
                store.users.update_running_status(user_id, running).await?;
                println!("User {} running: {}", user_id, running);
            }
        },
        Commands::Presets { action } => match action {
            PresetCommands::List { user_id, active } => {
                let presets = if active {
                    store.presets.list_active_presets(user_id).await?
                } else {
                    store.presets.list_presets(user_id).await?
                };
                print_json(&presets)?
            }
            PresetCommands::Add {
                user_id,
                name,
                pairs,
                interval,
                percent,
                active,
            } => {
                let interval: Interval = interval.parse()?;
                let preset = store
                    .presets
                    .create_preset(
                        user_id,
                        NewPreset {
                            preset_name: name,
                            pairs,
                            interval,
                            percent,
                            is_active: active,
                        },
                    )
                    .await?;
                print_json(&preset)?
            }
            PresetCommands::Toggle { preset_id, active } => {
                store.presets.set_preset_active(preset_id, active).await?;
                println!("Preset {} active: {}", preset_id, active);
            }
            PresetCommands::Delete { preset_id } => {
                store.presets.delete_preset(preset_id).await?;
                println!("Deleted preset {}", preset_id);
            }
        },
        Commands::State => print_json(&store.state.load_all().await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Cannot render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
