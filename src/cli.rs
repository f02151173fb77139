//! Command line interface

use clap::Parser;
use std::path::PathBuf;

/// Serve a directory over HTTP with cross-origin isolation headers and caching disabled
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "coi-serve")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Address to listen on [default: 127.0.0.1]
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on [default: 8000]
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory to serve [default: current directory]
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Configuration file (extension optional)
    #[arg(long)]
    pub config: Option<String>,
}
