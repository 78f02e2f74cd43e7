use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::JsonModel;
use crate::config::OpenAiConfig;
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that always responds with valid JSON.";

pub struct OpenAiClient {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::config("OpenAI API key not found (set OPENAI_API_KEY)"))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn api_error(msg: impl std::fmt::Display) -> Error {
    Error::Generation(format!("OpenAI API error: {msg}"))
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::from(e)
    } else {
        api_error(e)
    }
}

#[async_trait]
impl JsonModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn send_prompt(&self, prompt: &str, temperature: f32) -> Result<Value> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = text.len(), "chat completion response");

        if !status.is_success() {
            let msg = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}: {text}"));
            return Err(api_error(msg));
        }

        let completion: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| api_error(format!("unexpected response body: {e}")))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| api_error("response contained no message content"))?;

        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(_) => Err(Error::MalformedResponse { raw: content }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("test_api_key".into()),
            model: "gpt-4o-mini".into(),
            max_tokens: 500,
            base_url: base_url.into(),
            timeout_secs: 5,
        }
    }

    fn completion(content: &str) -> String {
        json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn new_without_api_key() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.api_key = None;
        let err = OpenAiClient::new(&cfg).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OpenAI API key not found"));
    }

    #[test]
    fn new_uses_configured_max_tokens() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.max_tokens = 1000;
        let client = OpenAiClient::new(&cfg).unwrap();
        assert_eq!(client.max_tokens, 1000);
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn send_prompt_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test_api_key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "Test prompt"}
                ],
                "temperature": 0.7,
                "max_tokens": 500,
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(completion(r#"{"test": "response"}"#))
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(&server.url())).unwrap();
        let value = client.send_prompt("Test prompt", 0.7).await.unwrap();
        assert_eq!(value, json!({"test": "response"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_prompt_passes_max_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"max_tokens": 1000})))
            .with_status(200)
            .with_body(completion("{}"))
            .create_async()
            .await;

        let mut cfg = config(&server.url());
        cfg.max_tokens = 1000;
        let client = OpenAiClient::new(&cfg).unwrap();
        client.send_prompt("Test prompt", 0.7).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_prompt_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("not json"))
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(&server.url())).unwrap();
        let err = client.send_prompt("Test prompt", 0.7).await.unwrap_err();
        match &err {
            Error::MalformedResponse { raw } => assert_eq!(raw, "not json"),
            other => panic!("expected malformed response, got {other:?}"),
        }
        assert!(err.to_string().contains("API response was not valid JSON format"));
        assert!(err.to_string().contains("not json"));
    }

    #[tokio::test]
    async fn send_prompt_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(r#"{"error": {"message": "API Error", "type": "server_error"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(&server.url())).unwrap();
        let err = client.send_prompt("Test prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(err.to_string(), "OpenAI API error: API Error");
    }

    #[tokio::test]
    async fn send_prompt_api_error_without_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(&server.url())).unwrap();
        let err = client.send_prompt("Test prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn send_prompt_without_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(&server.url())).unwrap();
        let err = client.send_prompt("Test prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains("no message content"));
    }

    #[tokio::test]
    async fn unreachable_server_is_generation_error() {
        let client = OpenAiClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client.send_prompt("Test prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().starts_with("OpenAI API error"));
    }
}
