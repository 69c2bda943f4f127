pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use rfg_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Update {
            asm,
            dry_run,
            scan,
            json,
        } => handlers::handle_update(asm, dry_run, scan, json),
        Commands::List {
            asm,
            primitives,
            json,
        } => handlers::handle_list(asm, primitives, json),
        Commands::Copy {
            destination,
            source,
            container,
            update,
            scan,
        } => handlers::handle_copy(destination, source, container, update, scan),
    }
}
