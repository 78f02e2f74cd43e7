use tracing::info;

use crate::agents::Agent;
use crate::error::{Error, Result};
use crate::model::board::{CardView, FormattedBoard};
use crate::model::story::UserStories;
use crate::providers::Provider;

pub const DEFAULT_COLUMN: &str = "Doing";

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub board_id: Option<String>,
    pub column: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            board_id: None,
            column: DEFAULT_COLUMN.into(),
        }
    }
}

/// First card of `column`. A missing column and an empty one fail the same way.
pub fn select_first_card<'a>(board: &'a FormattedBoard, column: &str) -> Result<&'a CardView> {
    board
        .cards_in(column)
        .first()
        .ok_or_else(|| Error::BusinessRule(format!("No cards found in '{column}' column")))
}

async fn ensure_valid_credentials(provider: &dyn Provider) -> Result<()> {
    if !provider.validate_credentials().await? {
        return Err(Error::config(format!(
            "{} did not accept the configured credentials",
            provider.name()
        )));
    }
    println!("Successfully authenticated with {}!", provider.name());
    Ok(())
}

/// Validate, fetch the board, pick the first card of the column and hand it to the agent.
pub async fn run_stories(
    provider: &dyn Provider,
    agent: &dyn Agent,
    options: &RunOptions,
) -> Result<UserStories> {
    ensure_valid_credentials(provider).await?;

    let raw = provider.get_board_contents(options.board_id.as_deref()).await?;
    let board = provider.format_board_contents(&raw);
    info!(board = %board.name, lists = board.lists.len(), cards = board.card_count(), "board fetched");

    println!("\nBoard Information:");
    println!("Name: {}", board.name);
    println!("Description: {}", board.description);

    let card = select_first_card(&board, &options.column)?;
    info!(card = %card.name, column = %options.column, agent = agent.name(), "card selected");
    agent.process_card(card).await
}

pub async fn validate(provider: &dyn Provider) -> Result<()> {
    ensure_valid_credentials(provider).await
}

pub async fn print_board(provider: &dyn Provider, board_id: Option<&str>) -> Result<()> {
    let raw = provider.get_board_contents(board_id).await?;
    let board = provider.format_board_contents(&raw);
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}

pub async fn print_lists(provider: &dyn Provider, board_id: Option<&str>) -> Result<()> {
    for list in provider.get_lists(board_id).await? {
        let pos = list.pos.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
        println!("{}\t{}\t{}", list.id, pos, list.name);
    }
    Ok(())
}

pub async fn print_cards(provider: &dyn Provider, list_id: Option<&str>) -> Result<()> {
    let cards = provider.get_cards_in_list(list_id).await?;
    if cards.is_empty() {
        println!("No cards.");
    }
    for card in &cards {
        let view = CardView::from(card);
        print!("- {}", view.name);
        if !view.labels.is_empty() {
            print!(" [{}]", view.labels.join(", "));
        }
        if let Some(due) = &view.due {
            print!(" (due {due})");
        }
        println!();
    }
    Ok(())
}
