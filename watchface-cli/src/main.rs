//! Binary crate for the `watchface` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Feeding phone messages into the face and printing frames

use clap::Parser;

mod cli;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logger::init(cmd.log_level());
    cmd.run().await
}
