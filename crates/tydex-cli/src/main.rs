//! tydex command-line front end.
//!
//! Gathers a package directory into memory, runs the declaration
//! extraction pipeline, and renders the result either as JSON or as a
//! tree of `.d.ts` files.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tydex")]
#[command(about = "TypeScript declaration extraction pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract declaration files from a package directory
    Extract {
        /// Package directory containing sources and package.json
        #[arg(default_value = ".")]
        dir: String,
        /// Directory to write declaration files into
        #[arg(short, long, default_value = "types")]
        out_dir: String,
        /// Print the full result as JSON instead of writing files
        #[arg(long)]
        json: bool,
        /// Keep every declaration file instead of filtering to the
        /// manifest entry points
        #[arg(long)]
        no_filter: bool,
        /// Skip dependency shim generation
        #[arg(long)]
        no_externals: bool,
        /// Emit .d.ts.map companions next to each declaration file
        #[arg(long)]
        declaration_map: bool,
        /// Pipeline time budget in milliseconds
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
        /// Print run notes
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the declaration form of a single source file
    Print {
        /// Source file
        file: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            dir,
            out_dir,
            json,
            no_filter,
            no_externals,
            declaration_map,
            timeout_ms,
            verbose,
        } => commands::extract::execute(
            dir,
            out_dir,
            json,
            no_filter,
            no_externals,
            declaration_map,
            timeout_ms,
            verbose,
        ),
        Commands::Print { file } => commands::print::execute(file),
    }
}
