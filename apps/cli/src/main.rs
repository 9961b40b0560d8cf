//! Bestium docs CLI: builds the documentation site.
//!
//! Resolves the latest release versions, interpolates them into the Markdown
//! pages, rewrites javadoc links and writes static HTML.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
