//! Search one site through a list of candidate mirrors
//!
//! Run with: cargo run --example search -p torrscrape-core -- tpb ubuntu https://mirror-a.example https://mirror-b.example
//!
//! Log output is controlled with RUST_LOG (e.g. RUST_LOG=torrscrape_core=debug).

use torrscrape_core::{DocumentFetcher, ScraperConfig, TorrentScraper, connect_by_code};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(site), Some(query)) = (args.next(), args.next()) else {
        eprintln!("usage: search <tpb|kat|nyaa> <query> <mirror>...");
        std::process::exit(2);
    };
    let config = ScraperConfig::with_mirrors(args);

    let scraper = connect_by_code(&site, DocumentFetcher::new()?, &config).await?;
    if !scraper.can_search() {
        eprintln!("No usable mirror for {}", scraper.site());
        std::process::exit(1);
    }

    let results = scraper.search(&query, 1).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
