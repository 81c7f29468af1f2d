mod cli;
mod console;
mod settings;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    console::run_app(cli::Cli::parse())
}
