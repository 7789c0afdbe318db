//! Khel CLI - sign in and inspect dashboard routing from the terminal.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use khel_client::Role;
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Khel - sports management client
#[derive(Parser, Debug)]
#[command(name = "khel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: <config dir>/khel/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (default: <config dir>/khel/session.json)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in
    Login {
        /// Account role (admin, coach, athlete, sponsor, ...)
        #[arg(short, long, value_parser = commands::parse_role)]
        role: Role,
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show the signed-in identity
    Whoami,

    /// Resolve a URL path against the stored session
    Route {
        /// Path to resolve (default: the app root)
        path: Option<String>,
    },

    /// List the dashboard navigation for the signed-in role
    Nav,

    /// Show status
    Status,

    /// Sign out
    Logout,

    /// Show or change client settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the settings in effect
    Show,
    /// Change one setting (api_url, sign_in_path, request_timeout_secs)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

fn read_password() -> std::io::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run(cli: Cli) -> commands::Result<()> {
    if let Commands::Version = cli.command {
        println!("khel {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Commands::Config { action } = &cli.command {
        let path = commands::config_file(cli.config)?;
        return match action {
            ConfigAction::Show => commands::config_show(&path),
            ConfigAction::Set { key, value } => commands::config_set(&path, key, value).map(|_| ()),
        };
    }

    let ctx = commands::Context::new(cli.config.as_deref(), cli.api_url, cli.session_file)?;

    match cli.command {
        Commands::Login {
            role,
            email,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            commands::login(&ctx, role, &email, &password).await
        }
        Commands::Whoami => commands::whoami(&ctx),
        Commands::Route { path } => commands::route(&ctx, path.as_deref()),
        Commands::Nav => commands::nav(&ctx),
        Commands::Status => commands::status(&ctx),
        Commands::Logout => commands::logout(&ctx).await,
        Commands::Version | Commands::Config { .. } => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("khel={log_level},khel_client={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    if let Err(e) = runtime.block_on(run(cli)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
