use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};
use typeahead_cli::run_script;
use typeahead_core::Engine;

#[derive(Parser)]
#[command(name = "typeahead")]
#[command(about = "Run ADD/DEL/QUERY/WQUERY commands against an in-memory typeahead index", long_about = None)]
struct Cli {
    /// Command script; reads stdin when omitted
    input: Option<PathBuf>,
    /// Treat every line as a command instead of expecting a leading count
    #[arg(long, default_value_t = false)]
    no_header: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let start = Instant::now();
    let mut engine = Engine::new();
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());
    let stats = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            run_script(&mut engine, BufReader::new(file), output, !cli.no_header)?
        }
        None => run_script(&mut engine, io::stdin().lock(), output, !cli.no_header)?,
    };

    tracing::info!(
        commands = stats.commands,
        queries = stats.queries,
        rejected = stats.rejected,
        entries = engine.len(),
        tokens = engine.token_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );
    Ok(())
}
