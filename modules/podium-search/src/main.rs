use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::error;
use tracing_subscriber::EnvFilter;

use podium_common::{Config, QueryResult, SpeechRecord, SAMPLE_KEYWORDS};
use podium_search::{SearchSession, SpeechFetcher};

#[derive(Parser)]
#[command(name = "podium")]
#[command(about = "Find inspiring commencement speeches by theme")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once and print the results
    Search {
        /// Theme to search for, e.g. "Failure"
        keyword: String,

        /// Print raw JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Read keywords from stdin; only the latest search's results are shown
    Interactive,

    /// List suggested keywords
    Samples,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("podium=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Samples => {
            for keyword in SAMPLE_KEYWORDS {
                println!("{keyword}");
            }
            Ok(())
        }
        Commands::Search { keyword, json } => {
            let config = Config::from_env()?;
            config.log_redacted();
            search_once(&SpeechFetcher::from_config(&config), &keyword, json).await
        }
        Commands::Interactive => {
            let config = Config::from_env()?;
            config.log_redacted();
            interactive(SpeechFetcher::from_config(&config)).await
        }
    }
}

async fn search_once(fetcher: &SpeechFetcher, keyword: &str, json: bool) -> Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("keyword must not be blank");
    }

    match fetcher.fetch(keyword).await {
        Ok(result) if json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Ok(result) => {
            print_results(keyword, &result);
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Search failed");
            anyhow::bail!(e.user_message())
        }
    }
}

async fn interactive(fetcher: SpeechFetcher) -> Result<()> {
    let session = Arc::new(SearchSession::new(Arc::new(fetcher)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = JoinSet::new();

    eprintln!("Type a theme and press enter (Ctrl-D to quit).");

    while let Some(line) = lines.next_line().await? {
        let keyword = line.trim().to_string();
        if keyword.is_empty() {
            continue;
        }

        let session = session.clone();
        searches.spawn(async move {
            match session.search(&keyword).await {
                Ok(Some(result)) => print_results(&keyword, &result),
                Ok(None) => {}
                Err(e) => {
                    error!(kind = e.kind(), error = %e, "Search failed");
                    eprintln!("{}", e.user_message());
                }
            }
        });
    }

    while searches.join_next().await.is_some() {}
    Ok(())
}

fn print_results(keyword: &str, result: &QueryResult) {
    if result.is_empty() {
        println!("No speeches found for \"{keyword}\".");
        return;
    }

    println!("Speeches about \"{keyword}\":\n");
    for speech in result {
        print_card(speech);
    }
}

fn print_card(speech: &SpeechRecord) {
    println!(
        "{} · {} {} ({})",
        speech.speaker, speech.university, speech.year, speech.role
    );
    println!("  {}", speech.topic);
    println!("  \"{}\"", speech.quote);
    println!("  {}", speech.summary);
    println!(
        "  {} · {} views · score {}",
        speech.popularity_label, speech.view_count_estimate, speech.recommendation_score
    );
    let action = if speech.video_id().is_some() {
        "Play"
    } else {
        "Search"
    };
    println!("  {action}: {}\n", speech.watch_url());
}
