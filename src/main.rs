mod agents;
mod app;
mod cli;
mod config;
mod error;
mod llm;
mod model;
mod providers;

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use agents::project_manager::ProjectManager;
use cli::Command;
use error::Error;
use providers::trello::TrelloProvider;

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let known = e.downcast_ref::<Error>();
            if known.is_some_and(Error::is_expected) {
                eprintln!("Error: {e:#}");
            } else {
                eprintln!("An error occurred: {e:#}");
            }
            ExitCode::from(known.map(Error::exit_code).unwrap_or(1))
        }
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let command = cli::parse_args(args)?;
    match &command {
        Command::Help => {
            cli::print_help();
            return Ok(());
        }
        Command::Show { path } => {
            let stories = agents::store::load_user_stories(path)?;
            println!("{}", agents::render::render_user_stories(&stories));
            return Ok(());
        }
        _ => {}
    }

    let config = config::load_config().context("Failed to load configuration")?;
    let trello = TrelloProvider::new(&config.trello)?;

    match command {
        Command::Run {
            options,
            output_dir,
        } => {
            let dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
            let agent = ProjectManager::new(&config.openai, dir)?;
            app::run_stories(&trello, &agent, &options).await?;
        }
        Command::Board { board_id } => app::print_board(&trello, board_id.as_deref()).await?,
        Command::Lists { board_id } => app::print_lists(&trello, board_id.as_deref()).await?,
        Command::Cards { list_id } => app::print_cards(&trello, list_id.as_deref()).await?,
        Command::Validate => app::validate(&trello).await?,
        Command::Help | Command::Show { .. } => {}
    }

    Ok(())
}
