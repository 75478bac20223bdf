//! Command-line argument parsing for ALRA
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ALRA - Auto-LitReview Agent over a personal corpus of research papers
#[derive(Parser, Debug)]
#[command(name = "alra")]
#[command(version = "0.2.0")]
#[command(about = "Retrieval-augmented research paper Q&A with query reasoning and grounding scores", long_about = None)]
pub struct Args {
    /// Verbosity level: -q (quiet), default (normal), -v (verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except final result)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest research paper PDFs into the vector index (replaces the old index)
    Ingest {
        /// PDF files to ingest
        #[arg(value_name = "PDF", required = true)]
        files: Vec<PathBuf>,
    },

    /// Ask a question about the ingested papers
    Ask {
        /// The question to answer
        #[arg(value_name = "QUESTION")]
        question: String,
    },

    /// Generate a structured comparison across papers for a topic
    Synthesize {
        /// Research topic, e.g. "Transformer architecture variants"
        #[arg(value_name = "TOPIC")]
        topic: String,
    },

    /// Run the golden-query benchmark against the current index
    Benchmark,

    /// Show interaction history and average grounding scores
    History,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}
