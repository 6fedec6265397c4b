use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, warn};

use cdiquerygenestoterm::query::{self, QueryConfig};

/// Run gene enrichment against the NDEx integrated-search service.
///
/// Takes a file with a comma-delimited list of genes and prints the best
/// matching term, if any, as JSON on stdout.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// File containing a comma-delimited list of genes
    input: PathBuf,

    /// Endpoint of the REST service
    #[arg(long, default_value = "http://public.ndexbio.org")]
    url: String,

    /// Seconds to wait between checks on task completion
    #[arg(long, default_value_t = 1.0)]
    polling_interval: f64,

    /// Timeout for HTTP requests, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Number of times to check for a completed task before giving up
    #[arg(long, default_value_t = 180)]
    retry_count: u32,
}

fn main() -> ExitCode {
    // stdout carries only the JSON result; all diagnostics go to stderr via
    // the logger, visible by default without RUST_LOG.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = QueryConfig {
        base_url: args.url,
        polling_interval: Duration::from_secs_f64(args.polling_interval),
        timeout: Duration::from_secs(args.timeout),
        retry_count: args.retry_count,
    };

    let run = query::read_gene_file(&args.input)
        .and_then(|genes| query::run_query(&genes, &config));
    match run {
        Ok(Some(term)) => match serde_json::to_string(&term) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("Caught exception: {err}");
                ExitCode::from(2)
            }
        },
        Ok(None) => {
            warn!("No terms found");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Caught exception: {err:#}");
            ExitCode::from(2)
        }
    }
}
