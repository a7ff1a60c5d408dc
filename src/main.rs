mod cli;
mod config;
mod error;
mod importers;
mod logging;
mod model;
mod output;
mod util;

use anyhow::{bail, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("asana") => cli::handle_import(&args[1..]).await,
        Some("help" | "-h" | "--help") | None => {
            cli::print_help();
            Ok(())
        }
        Some(other) => {
            cli::print_help();
            bail!("Unknown command: {other}");
        }
    }
}
