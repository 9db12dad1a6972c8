use anyhow::Context;
use clap::{Parser, Subcommand};
use reelmatch::prelude::*;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based movie recommender
#[derive(Parser, Debug)]
#[command(name = "reelmatch")]
#[command(about = "Recommend movies similar to a given title", long_about = None)]
struct Args {
    /// Path to the movie dataset (CSV with a header row)
    #[arg(short, long, default_value = "movie_dataset.csv")]
    dataset: PathBuf,

    /// JSON engine configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of recommendations per query
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Tokenizer: whitespace or word
    #[arg(long)]
    tokenizer: Option<TokenizerKind>,

    /// Build the full similarity matrix at startup
    #[arg(long)]
    precompute: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print recommendations for one title
    Recommend {
        title: String,
        /// Emit JSON instead of a numbered list
        #[arg(long)]
        json: bool,
    },
    /// Prompt for titles until EOF
    Interactive,
    /// Print corpus statistics
    Stats,
    /// Serve the REST API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

impl Args {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        if let Some(tokenizer) = self.tokenizer {
            config.tokenizer = tokenizer;
        }
        if self.precompute {
            config.precompute = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting reelmatch v{}", env!("CARGO_PKG_VERSION"));

    let config = args.engine_config()?;
    let dataset = args.dataset.clone();
    let corpus = tokio::task::spawn_blocking(move || CorpusHandle::load(&dataset, config))
        .await?
        .with_context(|| format!("error loading data from {}", args.dataset.display()))?;
    let corpus = Arc::new(corpus);

    match args.command {
        Command::Recommend { title, json } => print_recommendations(&corpus, &title, json),
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&corpus.stats())?);
            Ok(())
        }
        Command::Interactive => {
            tokio::task::spawn_blocking(move || interactive(corpus)).await?
        }
        Command::Serve { port } => serve(corpus, port).await,
    }
}

fn print_recommendations(corpus: &CorpusHandle, title: &str, json: bool) -> anyhow::Result<()> {
    let recs = recommend_default(corpus, title)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
    } else {
        render(&recs);
    }
    Ok(())
}

fn render(recs: &Recommendations) {
    println!("Movies similar to '{}':", recs.query_title);
    for (rank, rec) in recs.items.iter().enumerate() {
        println!("{}. {} (Similarity: {:.1}%)", rank + 1, rec.title, rec.score * 100.0);
    }
    println!("Found {} recommendations", recs.len());
}

fn interactive(corpus: Arc<CorpusHandle>) -> anyhow::Result<()> {
    let session = QuerySession::new(corpus)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("movie> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let title = line.trim();
        if title.is_empty() {
            println!("Please enter a movie title.");
            continue;
        }

        session.submit(title);
        match session.wait_latest(Duration::from_secs(60)) {
            Some(outcome) => match outcome.result {
                Ok(recs) => render(&recs),
                Err(e) if e.is_recoverable() => println!("{}", e),
                Err(e) => return Err(e.into()),
            },
            None => println!("Query timed out."),
        }
    }
    Ok(())
}

async fn serve(corpus: Arc<CorpusHandle>, port: u16) -> anyhow::Result<()> {
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(corpus, port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
