mod presets;
mod session;
mod trace;
mod utils;

use crate::cli::{Cli, Commands};
use vectorizer_studio::StudioResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> StudioResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> StudioResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(cmd),
        Commands::Presets => presets::run(),
        Commands::Session(cmd) => session::run(cmd),
    }
}
