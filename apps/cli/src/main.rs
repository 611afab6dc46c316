//! kbload — fill a knowledge base lookup table from a delimited text file.
//!
//! Each line of the source file holds one `key --- value` mapping. The named
//! KB is created (or its description refreshed) and every mapping inserted.

mod args;
mod commands;

use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = args::parse_cli(std::env::args_os());
    commands::init_tracing(&cli);
    let request = cli.load_request().unwrap_or_else(|err| err.exit());
    commands::run(&cli, request).await
}
