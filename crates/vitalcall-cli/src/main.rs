mod cmd_calls;
mod cmd_extract;
mod cmd_serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vitalcall",
    version,
    about = "Patient details from voice call transcripts"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Directory for call snapshots written by fetch-call-data
        #[arg(long, default_value = "extracted_data")]
        data_dir: PathBuf,
        /// Do not write call snapshots
        #[arg(long)]
        no_save: bool,
    },
    /// Extract patient information from a transcript file (stdin if omitted or "-")
    Extract {
        /// Transcript file
        file: Option<PathBuf>,
    },
    /// Call history from the provider
    Calls {
        #[command(subcommand)]
        cmd: cmd_calls::CallsCmd,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Serve {
            bind,
            port,
            data_dir,
            no_save,
        } => cmd_serve::execute(&bind, port, (!no_save).then_some(data_dir)),
        Command::Extract { file } => cmd_extract::execute(file.as_deref()),
        Command::Calls { cmd } => cmd_calls::run(cmd),
    }
}
