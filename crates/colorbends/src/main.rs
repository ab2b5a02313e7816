mod cli;
mod paths;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Still(args)) => run::render_still(args),
        Some(Command::Where) => run::print_paths(),
        None => run::run_window(cli.run),
    }
}
