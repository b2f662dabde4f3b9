use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// `pageroast` - AI landing-page critiques with email-gated full reports.
#[derive(Parser, Debug)]
#[command(name = "pageroast")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Roast a landing page with a vision model.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.pageroast/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Critique one image and print the analysis as JSON
    #[command(group(ArgGroup::new("image").required(true).args(["image_url", "file"])))]
    Critique {
        /// Publicly reachable image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Local image file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the gated view of a stored roast
    Show {
        /// Roast id
        id: String,
    },

    /// Validate configuration and show a summary
    Check,
}
