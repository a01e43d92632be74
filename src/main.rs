// src/main.rs
use anyhow::Result;
use clap::Parser;

use flacaudit::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    cli::run(&args)
}
