use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub as_a: String,
    pub i_want: String,
    pub so_that: String,
    pub acceptance_criteria: Vec<String>,
    /// Any other keys the model added, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the project-manager agent asks the model to produce for one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStories {
    pub epic: String,
    pub user_stories: Vec<UserStory>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
