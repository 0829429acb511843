mod db;
mod stores;

use clap::{Parser, Subcommand};
use nextcoffee_core::Coordinates;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nextcoffee")]
#[command(about = "Find coffee shops near you and vote for your favourites")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List coffee shops around a location plus the featured city
    Nearby {
        /// Position as `lat,lng` (e.g. 59.91,10.75)
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true, conflicts_with = "ip")]
        lat_long: Option<Coordinates>,
        /// Look the position up from this machine's public IP
        #[arg(long)]
        ip: bool,
    },
    /// Show a coffee shop page with its live vote count
    Show {
        id: String,
        /// Load the nearby list for this position first, as if arriving
        /// from the listing page
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        lat_long: Option<Coordinates>,
        /// Keep the page open and print vote updates for this many seconds
        #[arg(long, default_value = "0")]
        watch_secs: u64,
        /// Vote for the shop once the page is open
        #[arg(long)]
        vote: bool,
    },
    /// Vote for a coffee shop that has already been opened once
    Vote { id: String },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that DATABASE_URL is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Nearby { lat_long, ip }) => {
            let config = nextcoffee_core::load_client_config()?;
            let view = stores::run_nearby(&config, lat_long, ip).await?;
            print!("{view}");
        }
        Some(Commands::Show {
            id,
            lat_long,
            watch_secs,
            vote,
        }) => {
            let config = nextcoffee_core::load_client_config()?;
            stores::run_show(&config, &id, lat_long, watch_secs, vote).await?;
        }
        Some(Commands::Vote { id }) => {
            let config = nextcoffee_core::load_client_config()?;
            println!("{}", stores::run_vote(&config, &id).await?);
        }
        Some(Commands::Db { command }) => {
            let pool = nextcoffee_db::connect_pool_from_env().await?;
            match command {
                DbCommands::Ping => db::run_db_ping(&pool).await?,
                DbCommands::Migrate => db::run_db_migrate(&pool).await?,
            }
        }
        None => println!("nextcoffee: no command given, see --help"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
