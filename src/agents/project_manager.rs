use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::render::render_user_stories;
use super::store::save_user_stories;
use super::story_prompt::build_prompt;
use super::Agent;
use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::llm::openai::OpenAiClient;
use crate::llm::{JsonModel, DEFAULT_TEMPERATURE};
use crate::model::board::CardView;
use crate::model::story::UserStories;

/// Breaks a card down into an epic and user stories.
pub struct ProjectManager {
    model: Box<dyn JsonModel>,
    output_dir: PathBuf,
}

impl ProjectManager {
    pub fn new(config: &OpenAiConfig, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = OpenAiClient::new(config)?;
        Ok(Self::with_model(Box::new(client), output_dir))
    }

    pub fn with_model(model: Box<dyn JsonModel>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Agent for ProjectManager {
    fn name(&self) -> &str {
        "project-manager"
    }

    fn generate_prompt(&self, card: &CardView) -> String {
        build_prompt(card)
    }

    async fn process_card(&self, card: &CardView) -> Result<UserStories> {
        println!("\nProcessing card: {}", card.name);
        info!(card = %card.name, model = %self.model.model_name(), "generating user stories");

        let prompt = self.generate_prompt(card);
        let value = self.model.send_prompt(&prompt, DEFAULT_TEMPERATURE).await?;
        let stories: UserStories =
            serde_json::from_value(value.clone()).map_err(|_| Error::MalformedResponse {
                raw: value.to_string(),
            })?;

        let path = save_user_stories(&self.output_dir, &stories)?;
        println!("\n💾 Saved user stories to: {}", path.display());
        println!("\n{}", render_user_stories(&stories));

        Ok(stories)
    }
}
