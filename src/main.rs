mod categories;
mod discover;
mod fetch;
mod parser;
mod scrape;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::bail;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hac_scraper", about = "hopamchuan.com chord-lyrics scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect song links from category listings
    Collect {
        /// File to store collected song URLs
        #[arg(long, default_value = "song_links.json")]
        output: PathBuf,
        /// Category slug (e.g. ballad) or a raw listing path; repeat to
        /// include multiple categories. Defaults to all.
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Scrape song details from collected links
    Scrape {
        /// Song link list generated by the collect phase
        #[arg(long, default_value = "song_links.json")]
        links: PathBuf,
        /// File to dump scraped song data
        #[arg(long, default_value = "hopamchuan_songs.json")]
        output: PathBuf,
        /// Delay in seconds between song requests
        #[arg(long, default_value_t = 2.0)]
        delay: f64,
    },
    /// Collect + scrape in one pipeline
    Run {
        #[arg(long, default_value = "song_links.json")]
        links: PathBuf,
        #[arg(long, default_value = "hopamchuan_songs.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 2.0)]
        delay: f64,
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Show counts over a scraped output file
    Stats {
        #[arg(long, default_value = "hopamchuan_songs.json")]
        songs: PathBuf,
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

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Collect { output, categories } => {
            let paths = categories::resolve(&categories)?;
            let client = fetch::build_client()?;

            let mut links = store::load_links(&output);
            let before = links.len();
            let outcome = discover::collect_links(&client, &paths, &mut links).await;
            // Persist on every exit path, interrupted runs included.
            store::save_links(&output, &links)?;
            println!(
                "Collected {} song links ({} new, {} listing pages)",
                links.len(),
                links.len() - before,
                outcome.pages
            );
            if outcome.interrupted {
                println!("Interrupted; partial link set saved to {}", output.display());
            }
            Ok(())
        }
        Commands::Scrape { links, output, delay } => {
            if !links.exists() {
                bail!("Links file not found: {}", links.display());
            }
            let link_set = store::load_links(&links);
            if link_set.is_empty() {
                println!("No song links in {}. Run 'collect' first.", links.display());
                return Ok(());
            }

            let client = fetch::build_client()?;
            let mut songs = store::load_songs(&output);
            println!("Scraping {} songs...", link_set.len());
            let outcome = scrape::scrape_songs(
                &client,
                link_set.urls(),
                Duration::from_secs_f64(delay),
                &mut songs,
            )
            .await;
            store::save_songs(&output, &songs)?;
            println!(
                "Done: {} fetched, {} failed, {} already scraped ({} records total).",
                outcome.fetched,
                outcome.failed,
                outcome.already,
                songs.len()
            );
            if outcome.interrupted {
                println!("Interrupted; partial output saved to {}", output.display());
            }
            Ok(())
        }
        Commands::Run { links, output, delay, categories } => {
            let paths = categories::resolve(&categories)?;
            let client = fetch::build_client()?;

            // Phase 1: link discovery
            let mut link_set = store::load_links(&links);
            let before = link_set.len();
            let discovered = discover::collect_links(&client, &paths, &mut link_set).await;
            store::save_links(&links, &link_set)?;
            println!(
                "Collected {} song links ({} new)",
                link_set.len(),
                link_set.len() - before
            );
            if discovered.interrupted {
                println!("Interrupted during discovery; skipping detail scrape.");
                return Ok(());
            }
            if link_set.is_empty() {
                println!("No song links found.");
                return Ok(());
            }

            // Phase 2: song details
            let mut songs = store::load_songs(&output);
            println!("Scraping {} songs...", link_set.len());
            let outcome = scrape::scrape_songs(
                &client,
                link_set.urls(),
                Duration::from_secs_f64(delay),
                &mut songs,
            )
            .await;
            store::save_songs(&output, &songs)?;
            println!(
                "Done: {} fetched, {} failed, {} already scraped ({} records total).",
                outcome.fetched,
                outcome.failed,
                outcome.already,
                songs.len()
            );
            if outcome.interrupted {
                println!("Interrupted; partial output saved to {}", output.display());
            }
            Ok(())
        }
        Commands::Stats { songs } => {
            let records = store::load_songs(&songs);
            if records.is_empty() {
                println!("No songs in {}.", songs.display());
                return Ok(());
            }
            let with_lyrics = records.iter().filter(|s| !s.lyrics.is_empty()).count();
            let with_artist = records.iter().filter(|s| s.artist.is_some()).count();
            let with_genre = records.iter().filter(|s| s.genre.is_some()).count();
            let with_views = records.iter().filter(|s| s.views.is_some()).count();
            println!("Songs:       {}", records.len());
            println!("With lyrics: {}", with_lyrics);
            println!("With artist: {}", with_artist);
            println!("With genre:  {}", with_genre);
            println!("With views:  {}", with_views);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
