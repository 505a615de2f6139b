// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod recompute;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Membership backend server and administrative commands
#[derive(Parser)]
#[command(name = "membership-backend")]
#[command(about = "Membership backend with group-derived access flags", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    Serve,

    /// Run pending database migrations and exit
    Migrate,

    /// Recompute derived access flags from group extensions
    Recompute {
        /// Only recompute the members of this group
        #[arg(long)]
        group: Option<i32>,
    },

    /// Create a user and make them a member of a superuser group
    Bootstrap {
        /// Identity-provider subject of the user
        #[arg(long)]
        subject: String,

        #[arg(long)]
        username: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Group granting every access flag; created when missing
        #[arg(long, default_value = bootstrap::DEFAULT_ADMIN_GROUP)]
        group: String,
    },

    /// Print a signed bearer token for local development
    Token {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        username: Option<String>,

        /// Lifetime in seconds
        #[arg(long, default_value_t = 3600)]
        ttl: i64,
    },
}

/// Execute a CLI command other than `serve` and `migrate`
///
/// Those two are handled by main, since they do not need the full AppData.
pub async fn execute_command(
    command: Commands,
    app_data: Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {
            return Err("serve and migrate are run by main".into());
        }
        Commands::Recompute { group } => {
            recompute::recompute_flags(app_data, group).await?;
        }
        Commands::Bootstrap {
            subject,
            username,
            email,
            group,
        } => {
            bootstrap::bootstrap_superuser(app_data, &subject, &username, &email, &group).await?;
        }
        Commands::Token { subject, username, ttl } => {
            token::print_token(&app_data, &subject, username.as_deref(), ttl)?;
        }
    }

    Ok(())
}
