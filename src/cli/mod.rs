pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "backoffice-api")]
#[command(about = "Back-office API server - forms, workflows, user management and live notifications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Mint a bearer token for local testing")]
    Token {
        #[arg(long, help = "Tenant id placed in the orgId claim")]
        org: String,
        #[arg(long, help = "Username claim")]
        user: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Token { org, user } => commands::token::handle(&org, &user),
    }
}
