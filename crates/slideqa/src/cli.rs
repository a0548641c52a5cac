//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Args, Parser, Subcommand};
use slide_qa::ResolveContext;
use std::path::PathBuf;

/// Slide QA resolver
#[derive(Parser)]
#[command(name = "slideqa")]
#[command(about = "Resolve lesson content identifiers into question/answer pairs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to /etc/slideqa/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one identifier
    Resolve {
        identifier: String,

        #[command(flatten)]
        context: ContextArgs,

        /// JSON file of overrides keyed by identifier or short code
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Resolve identifiers read one per line (JSON Lines output)
    Batch {
        /// Input file, stdin when omitted
        file: Option<PathBuf>,

        #[command(flatten)]
        context: ContextArgs,

        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Show the content tag and extracted entities for an identifier
    Classify {
        identifier: String,

        #[command(flatten)]
        context: ContextArgs,

        #[arg(long)]
        json: bool,
    },

    /// Expand a terse answer into a full sentence
    Normalize { question: String, answer: String },

    /// Validate knowledge tables and print entry counts
    Check {
        /// Tables file, the configured or built-in tables when omitted
        #[arg(long)]
        knowledge: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

/// Catalog context shared by the resolving commands
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Book reference, e.g. "7" or "book7"
    #[arg(long)]
    pub book: Option<String>,

    /// Unit reference, e.g. "4" or "unit4"
    #[arg(long)]
    pub unit: Option<String>,

    /// Human-readable title for the title-parse fallback
    #[arg(long)]
    pub title: Option<String>,

    /// Description paired with a question-mark title
    #[arg(long)]
    pub description: Option<String>,
}

impl ContextArgs {
    pub fn to_context(&self) -> ResolveContext {
        ResolveContext {
            book_id: self.book.clone(),
            unit_id: self.unit.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}
