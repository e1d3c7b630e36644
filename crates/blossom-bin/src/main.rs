use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Inspect blobs the way a blossom server sees them
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compute the content address of files
    Hash(commands::hash::Opt),
    /// Print the metadata a server would record for a file
    Inspect(commands::inspect::Opt),
    /// Validate a hash and print its canonical form
    Parse(commands::parse::Opt),
}

/// Entry point of the `blossom` cli.
fn main() -> miette::Result<()> {
    // Parse the command line arguments
    let cli = Cli::parse();

    // Setup default logging level
    let default_filter = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_filter.into())
        .from_env()
        .into_diagnostic()?;

    // Setup the tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .try_init()
        .into_diagnostic()?;

    // Dispatch the selected command
    match cli.command {
        Commands::Hash(opts) => commands::hash::hash(opts),
        Commands::Inspect(opts) => commands::inspect::inspect(opts),
        Commands::Parse(opts) => commands::parse::parse(opts),
    }
}
