use clap::{Parser, Subcommand};
use nikeplus_cli::cli::{commands, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "nikeplus")]
#[command(author, version, about = "CLI for the Nike+ running activity service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Nike+ account email
    #[arg(short, long, global = true, env = "NIKEPLUS_EMAIL")]
    email: Option<String>,

    /// Nike+ account password (prompted for when not set)
    #[arg(long, global = true, env = "NIKEPLUS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log diagnostics, including response bodies that fail to decode
    #[arg(short, long, global = true, env = "NIKEPLUS_DEBUG")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Activity commands
    Activities {
        #[command(subcommand)]
        command: ActivityCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Log in and show the account screen name
    Check,
}

#[derive(Subcommand)]
enum ActivityCommands {
    /// List activities
    List {
        /// Number of activities to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List activity ids
    Ids,
    /// Get activity details with derived speed and pace
    Get {
        /// Activity ID
        id: String,
        /// Include route waypoints
        #[arg(short, long)]
        waypoints: bool,
    },
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "nikeplus_cli=debug" } else { "nikeplus_cli=info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> nikeplus_cli::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match commands::resolve_config(cli.email, cli.password, cli.debug) {
        Ok(config) => match cli.command {
            Commands::Auth { command } => match command {
                AuthCommands::Check => commands::check_login(&config).await,
            },
            Commands::Activities { command } => match command {
                ActivityCommands::List { limit } => {
                    commands::list_activities(&config, limit, cli.format).await
                }
                ActivityCommands::Ids => commands::list_activity_ids(&config).await,
                ActivityCommands::Get { id, waypoints } => {
                    commands::get_activity(&config, &id, waypoints, cli.format).await
                }
            },
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", nikeplus_cli::error::format_user_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
