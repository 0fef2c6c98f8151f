use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "keepsake",
    version,
    about = "Paginate and preview a memory-book story export.",
    long_about = None
)]
pub struct Cli {
    /// Print preview history
    #[clap(short = 'r', long)]
    pub history: bool,

    /// Dump the paginated book to stdout instead of opening the previewer
    #[clap(short, long)]
    pub dump: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Path to a story export (JSON)
    #[clap(name = "BOOK")]
    pub book: Vec<String>,
}
