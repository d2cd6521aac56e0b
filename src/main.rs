mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod reports;
mod session;
mod settings;
mod store;
mod tui;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{CategoriesCommands, Cli, Commands};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add { name } => cli::categories::add(&name),
            CategoriesCommands::Keyword { category, keyword } => {
                cli::categories::keyword(&category, &keyword)
            }
        },
        Commands::Show { file } => cli::show::run(&file),
        Commands::Review { file } => cli::review::run(&file),
        Commands::Chart { file } => cli::chart::run(&file),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "finsort", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
