pub mod categories;
pub mod chart;
pub mod init;
pub mod review;
pub mod show;

use std::path::Path;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::session::Session;
use crate::settings::categories_path;
use crate::store::CategoryStore;

#[derive(Parser)]
#[command(name = "finsort", about = "Sort bank CSV exports into spending categories.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up finsort: choose a data directory and create the category file.
    Init {
        /// Path for finsort data (default: ~/Documents/finsort)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage categories and their keywords.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Categorize a CSV export and print expense and payment summaries.
    Show {
        /// Path to the bank CSV export
        file: String,
    },
    /// Interactively re-categorize expenses; corrections become keywords.
    Review {
        /// Path to the bank CSV export
        file: String,
    },
    /// Chart expenses by category.
    Chart {
        /// Path to the bank CSV export
        file: String,
    },
    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories with their keywords.
    List,
    /// Add a new, keyword-less category.
    Add {
        /// Category name, e.g. 'Groceries'
        name: String,
    },
    /// Add a matching keyword to an existing category.
    Keyword {
        /// Category to extend
        category: String,
        /// Case-insensitive text to look for in transaction details
        keyword: String,
    },
}

pub(crate) fn open_store() -> Result<CategoryStore> {
    CategoryStore::load(&categories_path())
}

/// Open the store and load `file` into a fresh session.
pub(crate) fn open_session(file: &str) -> Result<Session> {
    let mut session = Session::new(open_store()?);
    session.on_file_uploaded(Path::new(file))?;
    Ok(session)
}
