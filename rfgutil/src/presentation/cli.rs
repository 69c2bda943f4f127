use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Tools for Red Faction Guerrilla asm_pc and str2_pc files",
    long_about = None
)]
pub struct Cli {
    /// Log more status updates (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update asm_pc files from the repacked str2_pc files in the same folder
    Update {
        /// asm_pc files to update; several are processed in parallel
        #[arg(required = true)]
        asm: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        scan: ScanArgs,

        /// Print one JSON report per asm_pc on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the containers (and optionally primitives) of an asm_pc
    List {
        asm: PathBuf,

        /// Also list the primitives of each container
        #[arg(short, long)]
        primitives: bool,

        #[arg(long)]
        json: bool,
    },

    /// Copy a container and its primitives from one asm_pc into another
    #[command(visible_alias = "move")]
    Copy {
        /// asm_pc that receives the container
        destination: PathBuf,
        /// asm_pc to copy from
        source: PathBuf,
        container: String,

        /// Update the destination from its str2_pc files afterwards
        #[arg(short, long)]
        update: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },
}

/// Which archives an update reads and which containers their entries reach.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Match every archive's entries against the primitives of all containers,
    /// not just the container named after the archive
    #[arg(long)]
    pub scan_all_containers: bool,

    /// Archive extension to scan (repeatable)
    #[arg(long = "ext", default_value = "str2_pc")]
    pub extensions: Vec<String>,
}
