use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Weekplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Week-view lane layout
    Lanes {
        #[command(subcommand)]
        action: commands::lanes::LanesAction,
    },
    /// Replan coordination
    Replan {
        #[command(subcommand)]
        action: commands::replan::ReplanAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Lanes { action } => commands::lanes::run(action),
        Commands::Replan { action } => commands::replan::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
