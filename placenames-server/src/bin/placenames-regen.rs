use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use placenames_server::regen::{regenerate, ChatConfig, ChatScorer, DEFAULT_SYSTEM_PROMPT};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "placenames-regen",
    about = "Recompute place-name relevancy with a chat-completions endpoint"
)]
struct Args {
    /// CSV data file whose names are rescored (`.gz` is decompressed)
    #[arg(
        long,
        env = "PLACENAMES_DATA_FILE",
        default_value = "data/placenames_with_relevancy.csv.gz"
    )]
    data_file: PathBuf,

    /// Where to write the `location,score` table
    #[arg(long, default_value = "popularity_scores.csv")]
    output: PathBuf,

    /// Concurrent scoring requests
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Chat-completions URL
    #[arg(
        long,
        env = "PLACENAMES_CHAT_URL",
        default_value = "http://localhost:8080/v1/chat/completions"
    )]
    api_url: String,

    /// Model name sent with each request, if the endpoint needs one
    #[arg(long, env = "PLACENAMES_CHAT_MODEL")]
    model: Option<String>,

    /// File holding the system prompt; a built-in prompt is used otherwise
    #[arg(long)]
    system_prompt_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("placenames_server=info".parse()?)
                .add_directive("placenames_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.workers == 0 {
        eprintln!("Error: --workers must be > 0");
        std::process::exit(1);
    }

    let system_prompt = match &args.system_prompt_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_SYSTEM_PROMPT.to_owned(),
    };

    info!(
        data_file = %args.data_file.display(),
        output = %args.output.display(),
        workers = args.workers,
        api_url = %args.api_url,
        "Regenerating relevancy scores"
    );

    let scorer = ChatScorer::new(ChatConfig {
        endpoint: args.api_url,
        model: args.model,
        system_prompt,
        timeout: Duration::from_secs(args.timeout_secs),
    })?;

    let rows = regenerate(&args.data_file, &args.output, args.workers, &scorer)?;
    info!(rows, "Done");
    Ok(())
}
