pub mod trello;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::board::{FormattedBoard, RawBoard, RawCard, RawList};

/// Read access to a board-hosting service.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// True only when the identity endpoint answers 200.
    async fn validate_credentials(&self) -> Result<bool>;

    /// Board with its open lists and open cards. Falls back to the configured
    /// board when `board_id` is `None`.
    async fn get_board_contents(&self, board_id: Option<&str>) -> Result<RawBoard>;

    async fn get_lists(&self, board_id: Option<&str>) -> Result<Vec<RawList>>;

    async fn get_cards_in_list(&self, list_id: Option<&str>) -> Result<Vec<RawCard>>;

    /// Group the raw board's cards under their list names.
    fn format_board_contents(&self, raw: &RawBoard) -> FormattedBoard {
        trello::format_board_contents(raw)
    }
}
