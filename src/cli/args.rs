//! Command line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// pahedl - resolve a pahe.win landing page and download the file behind it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// pahe.win landing page URL
    pub url: String,

    /// Directory the downloaded file lands in
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Resolve the download form and print its action URL, then exit
    #[arg(short = 'g', long)]
    pub print_url: bool,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
}

impl Args {
    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
