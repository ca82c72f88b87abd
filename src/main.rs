mod defaults;
mod extractor;
mod fetcher;
mod prices;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bdex_prices", about = "Grocery price scraper and API for bdex.ru")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the price API and the static frontend
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,
        /// Directory with the frontend files
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,
    },
    /// Fetch and extract prices once, print the result
    Fetch {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
        /// Dump the raw fetched page text instead of extracting
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, static_dir } => {
            let fetcher = fetcher::Fetcher::new()?;
            server::start(port, fetcher, static_dir).await
        }
        Commands::Fetch { json, raw } => {
            let fetcher = fetcher::Fetcher::new()?;
            if raw {
                println!("{}", fetcher.fetch().await?);
                return Ok(());
            }

            let table = prices::current_prices(&fetcher).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print_table(&table);
            }
            Ok(())
        }
    }
}

/// Compact, readable product/price listing, sorted by name.
fn print_table(table: &prices::PriceTable) {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let width = rows.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
    for (name, price) in &rows {
        println!("{:<width$}  {:>8.2} ₽", name, price, width = width);
    }
    println!("\n{} products", rows.len());
}
