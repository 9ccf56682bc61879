use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brancher")]
#[command(bin_name = "brancher")]
#[command(version)]
#[command(about = "Pick a start branch and a category, then create a conventionally named branch")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under ~/.config/brancher/diagnostics"
    )]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}
