pub mod openai;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A chat model that is asked to answer with a single JSON object.
#[async_trait]
pub trait JsonModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// One request, no retries. Returns the parsed JSON body of the answer.
    async fn send_prompt(&self, prompt: &str, temperature: f32) -> Result<Value>;
}
