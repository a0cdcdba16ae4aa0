//! CLI interface for Grechen.
//!
//! Anything that isn't a known subcommand is treated as free text to log:
//! `grechen told bob the design doc will be ready by friday`. Every command
//! is non-interactive. When an input can't be resolved without more detail,
//! the questions are printed and the command fails; nothing is written.

mod entities;
mod format;
mod input;
mod review;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    config::{Config, Provider},
    extract::{Extractor, GeminiExtractor, MockExtractor},
    model::CommitmentStatus,
    storage::Storage,
};

/// Grechen: log your day in plain words.
#[derive(Debug, Parser)]
#[command(name = "grechen", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Data directory (defaults to `GRECHEN_DATA_DIR`, then config, then `~/.grechen`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Extraction provider (defaults to `GRECHEN_LLM_PROVIDER`, then config, then gemini).
    #[arg(long, global = true, value_enum)]
    provider: Option<Provider>,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"Logging:
  grechen sitting down to work on kaifu
  grechen told bob the design doc will be ready by 2030-01-01
  grechen finished the farmer release
  grechen thats-wrong it was alice, not bob

Reflection:
  grechen today        what happened so far
  grechen review       the last week against its own average
  grechen goodnight    end-of-day questions, saved to today's notes"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the data directory, empty tables, and a README.
    Setup,

    /// Today's stats, logs, and open commitments.
    Today,

    /// All commitments with their status.
    Commitments,

    /// Open commitments carried over from previous days.
    Todo,

    /// Rolling stats over the baseline window, and every deviation.
    Review,

    /// Compare today against the baseline and record the top questions.
    Goodnight,

    /// List people, or rename one.
    People {
        #[command(subcommand)]
        command: Option<PeopleCommand>,
    },

    /// List projects, or set one's priority.
    Projects {
        #[command(subcommand)]
        command: Option<ProjectsCommand>,
    },

    /// Record a correction to something logged earlier.
    ThatsWrong {
        /// What was wrong.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Close out a commitment.
    Mark {
        /// Commitment ID.
        id: String,

        status: MarkStatus,
    },

    /// Free text to extract and record.
    #[command(external_subcommand)]
    Input(Vec<String>),
}

#[derive(Debug, Subcommand)]
pub enum PeopleCommand {
    /// Give a person a display name.
    Rename { id: String, name: String },
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// Set a project's priority.
    Priority { id: String, level: PriorityArg },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    High,
    Normal,
    Low,
}

impl PriorityArg {
    fn to_priority(self) -> i64 {
        match self {
            Self::High => 1,
            Self::Normal => 0,
            Self::Low => -1,
        }
    }
}

/// Statuses a commitment can be marked with by hand.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MarkStatus {
    Fulfilled,
    Violated,
    Archived,
}

impl MarkStatus {
    fn to_domain(self) -> CommitmentStatus {
        match self {
            Self::Fulfilled => CommitmentStatus::Fulfilled,
            Self::Violated => CommitmentStatus::Violated,
            Self::Archived => CommitmentStatus::Archived,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let storage =
        Storage::new(&root).map_err(|e| format!("failed to open {}: {e}", root.display()))?;

    match cli.command {
        Command::Setup => cmd_setup(&storage),
        Command::Today => review::cmd_today(&storage),
        Command::Commitments => entities::cmd_commitments(&storage),
        Command::Todo => review::cmd_todo(&storage),
        Command::Review => review::cmd_review(config, &storage),
        Command::Goodnight => review::cmd_goodnight(config, &storage),
        Command::People { command } => match command {
            None => entities::cmd_people(&storage),
            Some(PeopleCommand::Rename { id, name }) => {
                entities::cmd_rename_person(&storage, &id, &name)
            }
        },
        Command::Projects { command } => match command {
            None => entities::cmd_projects(&storage),
            Some(ProjectsCommand::Priority { id, level }) => {
                entities::cmd_set_priority(&storage, &id, level.to_priority())
            }
        },
        Command::ThatsWrong { text } => input::cmd_thats_wrong(&storage, &text.join(" ")),
        Command::Mark { id, status } => entities::cmd_mark(&storage, &id, status.to_domain()),
        Command::Input(words) => {
            let provider = config.resolve_provider(cli.provider)?;
            let extractor = build_extractor(config, provider)?;
            input::cmd_input(&storage, extractor.as_ref(), &words.join(" "))
        }
    }
}

fn build_extractor(config: &Config, provider: Provider) -> Result<Box<dyn Extractor>, String> {
    match provider {
        Provider::Gemini => {
            let gemini =
                GeminiExtractor::with_key(config.resolve_gemini_api_key(), &config.gemini_model)
                    .map_err(|e| e.to_string())?;
            Ok(Box::new(gemini))
        }
        Provider::Mock => Ok(Box::new(MockExtractor::new())),
    }
}

fn cmd_setup(storage: &Storage) -> Result<(), String> {
    let created = storage
        .initialize()
        .map_err(|e| format!("failed to set up {}: {e}", storage.root().display()))?;

    println!("data directory: {}", storage.root().display());
    if created.is_empty() {
        println!("already set up");
    }
    for name in created {
        println!("  created {name}");
    }
    Ok(())
}
