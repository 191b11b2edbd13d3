pub mod prompt;

use crate::journal::model::{Category, Tag};
use crate::refine::Tone;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dreamtome", about = "A dream journal for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a dream. Prompts for missing fields.
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<Tag>,
        #[arg(long, default_value_t = false)]
        refine: bool,
        #[arg(long)]
        tone: Option<Tone>,
    },
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<Category>,
    },
    View {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<Tag>>,
    },
    Delete {
        id: String,
    },
    /// Emotion, symbols and a reading for one dream (the latest if no id).
    Interpret {
        id: Option<String>,
    },
    Stats {
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    Export {
        id: Option<String>,
    },
    /// Erase every dream and every recorded day.
    Reset {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    Demo {
        #[command(subcommand)]
        command: DemoCommands,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Status,
}

#[derive(Debug, Subcommand)]
pub enum DemoCommands {
    Generate {
        #[arg(long)]
        count: Option<usize>,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}
