pub mod project_manager;
pub mod render;
pub mod store;
pub mod story_prompt;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::board::CardView;
use crate::model::story::UserStories;

/// A strategy that turns one card into generated output.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn generate_prompt(&self, card: &CardView) -> String;

    async fn process_card(&self, card: &CardView) -> Result<UserStories>;
}
