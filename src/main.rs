use anyhow::Context;
use clap::command;
use log::info;
use stamper::{stamp_dir, timestamp::BirthTime};

mod metadata;
mod stamper;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // no operands: the current directory is always the target
    command!()
        .about("Adds default front matter to markdown files lacking one, recursively from the current directory")
        .get_matches();

    let current_dir = std::env::current_dir().context("while resolving the current directory")?;
    let summary = stamp_dir(&current_dir, &BirthTime)?;
    info!("Done: {summary}");

    Ok(())
}
