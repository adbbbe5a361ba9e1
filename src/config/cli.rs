use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tarot-oracle")]
#[command(about = "Three-card tarot readings interpreted by Gemini")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        env = "TAROT_ASPECTS_FILE",
        help = "TOML file with the supported aspects"
    )]
    pub aspects: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "TAROT_CATALOG_FILE",
        help = "JSON card catalog to use instead of the built-in deck"
    )]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Draw three cards and interpret them in the terminal
    Read(ReadArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value = "3000")]
    pub port: u16,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReadArgs {
    #[arg(long, short)]
    pub question: String,

    #[arg(long, short, default_value = "general")]
    pub aspect: String,

    #[arg(long, help = "Seed the draw for a reproducible spread")]
    pub seed: Option<u64>,

    #[arg(long, help = "Print the prompt instead of calling Gemini")]
    pub dry_run: bool,
}
